// src/edgar/mod.rs
pub mod cik;
pub mod client;
pub mod locator;
pub mod models;

pub use client::{EdgarClient, FilingSource};
pub use models::{
    AnnualForm, DisclosureMetadata, FilerId, FilingEvent, RawFilingDocument, ReducedFilingText,
    TickerSymbol,
};
