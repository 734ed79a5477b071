// src/pipeline.rs
// ticker -> CIK -> disclosure metadata -> document URL -> raw filing -> reduced text.
// Every stage reports "no data" as `None` and the pipeline stops at the first one.

use crate::config::PipelineConfig;
use crate::edgar::client::{self, FilingSource};
use crate::edgar::models::{ReducedFilingText, TickerSymbol};
use crate::edgar::{cik, locator};
use crate::extractors::DocumentReducer;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Pipeline stage that came up empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Ticker not in the bundled CIK table
    Identifier,
    /// Metadata endpoint failed or returned nothing usable
    Metadata,
    /// No 10-K or 10-K/A among the disclosure events
    AnnualFiling,
    /// Filing archive fetch failed or returned an empty body
    Document,
    /// Filing has no well-formed `<DOCUMENT>` block
    Markers,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identifier => "identifier",
            Self::Metadata => "metadata",
            Self::AnnualFiling => "annual filing",
            Self::Document => "document",
            Self::Markers => "document markers",
        };
        f.write_str(name)
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilingContext {
    /// Reduced text of the most recent annual filing (may be empty)
    Found(ReducedFilingText),
    /// A stage found no data
    NotFound(Stage),
    /// A newer run started before this one finished
    Superseded,
}

impl FilingContext {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Filing text for prompt building; empty unless found.
    pub fn text(&self) -> &str {
        match self {
            Self::Found(text) => text.as_str(),
            Self::NotFound(_) | Self::Superseded => "",
        }
    }
}

/// Hands out run tokens from a shared generation counter. Beginning a run
/// supersedes every token issued before it.
#[derive(Debug, Clone, Default)]
pub struct RunTracker {
    latest: Arc<AtomicU64>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RunToken {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RunToken {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }
}

/// Identifies one run; stale once a newer run has begun.
#[derive(Debug, Clone)]
pub struct RunToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl RunToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// Stateless composition of the filing stages over a [`FilingSource`].
pub struct FilingPipeline {
    source: Arc<dyn FilingSource>,
    config: PipelineConfig,
    reducer: DocumentReducer,
    runs: RunTracker,
}

impl FilingPipeline {
    pub fn new(source: Arc<dyn FilingSource>, config: PipelineConfig) -> Self {
        let reducer = DocumentReducer::new(config.reduce_mode);
        Self {
            source,
            config,
            reducer,
            runs: RunTracker::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Starts a new run for `ticker`, superseding any run still in flight.
    pub async fn get_reduced_filing_text(&self, ticker: &str) -> FilingContext {
        let token = self.runs.begin();
        self.run(ticker, &token).await
    }

    /// Runs the stages under an existing token. The token is checked after
    /// every fetch; a stale run returns [`FilingContext::Superseded`].
    pub async fn run(&self, ticker: &str, token: &RunToken) -> FilingContext {
        let ticker = TickerSymbol::new(ticker);
        tracing::info!("Starting filing run {} for ticker {}", token.generation(), ticker);

        let Some(filer) = cik::resolve_symbol(&ticker) else {
            tracing::warn!("Ticker {} has no CIK; skipping filing lookup", ticker);
            return FilingContext::NotFound(Stage::Identifier);
        };

        let metadata_url = client::build_metadata_url(&self.config.metadata_base_url, filer);
        tracing::debug!("Metadata URL: {}", metadata_url);
        let metadata = client::fetch_metadata(self.source.as_ref(), &metadata_url).await;
        if !token.is_current() {
            return superseded(token);
        }
        let Some(metadata) = metadata else {
            return FilingContext::NotFound(Stage::Metadata);
        };

        let Some(filing) = locator::locate_most_recent_annual_filing(&metadata, self.config.ordering)
        else {
            return FilingContext::NotFound(Stage::AnnualFiling);
        };

        let document_url = locator::build_document_url(&self.config.archive_base_url, filer, filing);
        tracing::info!("Downloading from URL: {}", document_url);
        let document = client::fetch_document(self.source.as_ref(), &document_url).await;
        if !token.is_current() {
            return superseded(token);
        }
        let Some(document) = document else {
            return FilingContext::NotFound(Stage::Document);
        };

        match self.reducer.reduce(&document.0) {
            Some(reduced) => {
                tracing::info!(
                    "Filing run {} for {} produced {} bytes of context",
                    token.generation(),
                    ticker,
                    reduced.len()
                );
                FilingContext::Found(ReducedFilingText(reduced))
            }
            None => FilingContext::NotFound(Stage::Markers),
        }
    }
}

fn superseded(token: &RunToken) -> FilingContext {
    tracing::info!("Discarding filing run {}: a newer run has started", token.generation());
    FilingContext::Superseded
}
