// src/edgar/client.rs
use crate::config::PipelineConfig;
use crate::edgar::models::{DisclosureMetadata, FilerId, RawFilingDocument};
use crate::utils::error::EdgarError;
use async_trait::async_trait;
use reqwest::header;
use std::time::Duration;

// Concept used as a proxy index of a filer's disclosure history.
const METADATA_TAXONOMY: &str = "us-gaap";
const METADATA_CONCEPT: &str = "AccountsPayableCurrent";

/// Transport seam between the pipeline and EDGAR.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilingSource: Send + Sync {
    /// GET a company-concept document and decode it.
    async fn get_metadata(&self, url: &str) -> Result<DisclosureMetadata, EdgarError>;

    /// GET a raw filing document as text.
    async fn get_document(&self, url: &str) -> Result<String, EdgarError>;
}

/// Builds the company-concept endpoint URL for a filer.
/// Static template substitution, not a search.
pub fn build_metadata_url(metadata_base_url: &str, filer: FilerId) -> String {
    format!(
        "{}/api/xbrl/companyconcept/CIK{}/{}/{}.json",
        metadata_base_url.trim_end_matches('/'),
        filer.padded(),
        METADATA_TAXONOMY,
        METADATA_CONCEPT
    )
}

/// Fetches disclosure metadata. Transport failures are logged and reported
/// as `None`; callers treat that as "no data" and do not retry.
pub async fn fetch_metadata(source: &dyn FilingSource, url: &str) -> Option<DisclosureMetadata> {
    match source.get_metadata(url).await {
        Ok(metadata) => {
            tracing::info!(
                "Fetched disclosure metadata for CIK {} ({} events)",
                metadata.cik,
                metadata.events().len()
            );
            Some(metadata)
        }
        Err(e) => {
            tracing::error!("Failed to fetch disclosure metadata from {}: {}", url, e);
            None
        }
    }
}

/// Fetches the raw filing document. Transport failures and empty bodies are
/// logged and reported as `None`.
pub async fn fetch_document(source: &dyn FilingSource, url: &str) -> Option<RawFilingDocument> {
    match source.get_document(url).await {
        Ok(body) if body.is_empty() => {
            tracing::warn!("Filing document at {} is empty", url);
            None
        }
        Ok(body) => {
            tracing::info!("Successfully downloaded document ({} bytes)", body.len());
            Some(RawFilingDocument(body))
        }
        Err(e) => {
            tracing::error!("Failed to download filing document from {}: {}", url, e);
            None
        }
    }
}

/// reqwest-backed [`FilingSource`] that talks to SEC EDGAR.
/// Sends the mandatory User-Agent and waits a fixed delay before each request.
pub struct EdgarClient {
    client: reqwest::Client,
    request_delay: Duration,
}

impl EdgarClient {
    pub fn new(config: &PipelineConfig) -> Result<Self, EdgarError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        tracing::debug!("Using User-Agent: {}", config.user_agent);

        Ok(Self {
            client,
            request_delay: config.request_delay,
        })
    }

    async fn get(&self, url: &str, accept: &str) -> Result<reqwest::Response, EdgarError> {
        // --- Basic Rate Limiting ---
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, accept)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
                return Err(EdgarError::RateLimited);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(EdgarError::FilingDocNotFound(url.to_string()));
            }
            return Err(EdgarError::Http(status));
        }

        Ok(response)
    }
}

#[async_trait]
impl FilingSource for EdgarClient {
    async fn get_metadata(&self, url: &str) -> Result<DisclosureMetadata, EdgarError> {
        let body = self.get(url, "application/json").await?.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| EdgarError::Parse(format!("Invalid company-concept JSON: {}", e)))
    }

    async fn get_document(&self, url: &str) -> Result<String, EdgarError> {
        // Full submission files are SGML wrapping HTML and XBRL.
        let body = self
            .get(url, "text/plain,text/html,application/xml,*/*")
            .await?
            .text()
            .await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
