// src/extractors/mod.rs
pub mod reducer;

// Re-export key reduction types for convenience
pub use reducer::{reduce_preserving_tables, reduce_to_text, DocumentReducer};
