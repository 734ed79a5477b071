// src/lib.rs
// Retrieves a company's most recent annual report from SEC EDGAR and reduces
// it to text (optionally keeping table structure) for language-model context.

pub mod assistant;
pub mod config;
pub mod edgar;
pub mod extractors;
pub mod pipeline;
pub mod utils;

pub use config::{LocatorOrdering, PipelineConfig, ReduceMode};
pub use edgar::{EdgarClient, FilingSource};
pub use pipeline::{FilingContext, FilingPipeline, RunToken, RunTracker, Stage};
pub use utils::{AppError, EdgarError};
