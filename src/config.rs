// src/config.rs

use crate::utils::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

// SEC asks for a User-Agent naming the requester and a contact address.
const DEFAULT_USER_AGENT: &str = "filing-context research-tool (contact@example.com)";
const DEFAULT_METADATA_BASE_URL: &str = "https://data.sec.gov";
const DEFAULT_ARCHIVE_BASE_URL: &str = "https://www.sec.gov";
// SEC asks for 10 requests/second max. Stay well under it.
const DEFAULT_REQUEST_DELAY_MS: u64 = 150;

/// How the reducer treats markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReduceMode {
    /// Strip every tag
    Text,
    /// Keep bare table/tbody/thead/tr/th/td tags
    #[default]
    Tables,
}

impl FromStr for ReduceMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "tables" | "table" => Ok(Self::Tables),
            other => Err(AppError::Config(format!(
                "Unknown reduce mode '{}', expected 'text' or 'tables'",
                other
            ))),
        }
    }
}

/// How the locator picks the most recent annual filing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocatorOrdering {
    /// Trust the source's append order and scan from the end
    #[default]
    AppendOrder,
    /// Sort candidates by filing date first
    Chronological,
}

impl FromStr for LocatorOrdering {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" | "append-order" => Ok(Self::AppendOrder),
            "chronological" | "sorted" => Ok(Self::Chronological),
            other => Err(AppError::Config(format!(
                "Unknown locator ordering '{}', expected 'append' or 'chronological'",
                other
            ))),
        }
    }
}

/// Settings for one pipeline instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Host serving the company-concept API
    pub metadata_base_url: String,

    /// Host serving the filing archive
    pub archive_base_url: String,

    /// User-Agent sent with every request
    pub user_agent: String,

    /// Courtesy delay before each request
    pub request_delay: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Reducer variant used to build context
    pub reduce_mode: ReduceMode,

    /// Locator strategy
    pub ordering: LocatorOrdering,

    /// Upper bound on filing characters placed in an assistant prompt
    pub context_char_budget: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            metadata_base_url: DEFAULT_METADATA_BASE_URL.to_string(),
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            request_timeout: Duration::from_secs(30),
            reduce_mode: ReduceMode::Tables,
            ordering: LocatorOrdering::AppendOrder,
            context_char_budget: 400_000,
        }
    }
}

impl PipelineConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(agent) = lookup("SEC_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(url) = lookup("SEC_METADATA_BASE_URL") {
            config.metadata_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup("SEC_ARCHIVE_BASE_URL") {
            config.archive_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(ms) = lookup("SEC_REQUEST_DELAY_MS") {
            let ms = ms.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("Invalid SEC_REQUEST_DELAY_MS '{}': {}", ms, e))
            })?;
            config.request_delay = Duration::from_millis(ms);
        }
        if let Some(mode) = lookup("FILING_REDUCE_MODE") {
            config.reduce_mode = mode.parse()?;
        }
        if let Some(ordering) = lookup("FILING_ORDERING") {
            config.ordering = ordering.parse()?;
        }
        if let Some(chars) = lookup("FILING_CONTEXT_CHARS") {
            config.context_char_budget = chars.trim().parse::<usize>().map_err(|e| {
                AppError::Config(format!("Invalid FILING_CONTEXT_CHARS '{}': {}", chars, e))
            })?;
        }

        Ok(config)
    }
}
