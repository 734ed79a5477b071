// src/edgar/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Ticker symbol as entered by the user, case-normalized at entry.
/// No other validation: unknown tickers simply fail to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TickerSymbol(String);

impl TickerSymbol {
    pub fn new(input: &str) -> Self {
        Self(input.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Central Index Key (CIK) assigned by the SEC to a reporting company.
///
/// `Display` renders the bare number as used in archive paths;
/// [`FilerId::padded`] renders the 10-digit form the data API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilerId(u64);

impl FilerId {
    pub fn new(cik: u64) -> Self {
        Self(cik)
    }

    /// Parses a numeric CIK string, with or without leading zeros.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse::<u64>().ok().map(Self)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn padded(&self) -> String {
        format!("{:010}", self.0)
    }
}

impl fmt::Display for FilerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Annual report form types the locator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnualForm {
    #[serde(rename = "10-K")]
    Annual,
    #[serde(rename = "10-K/A")]
    Amendment,
}

impl AnnualForm {
    pub fn from_form(form: &str) -> Option<Self> {
        match form.trim() {
            "10-K" => Some(Self::Annual),
            "10-K/A" => Some(Self::Amendment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "10-K",
            Self::Amendment => "10-K/A",
        }
    }
}

/// One disclosure record from the company-concept endpoint.
/// Example entry:
/// `{"end":"2023-09-30","val":62611000000,"accn":"0000320193-23-000106","fy":2023,"fp":"FY","form":"10-K","filed":"2023-11-03"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingEvent {
    pub form: String,
    pub filed: String,
    pub accn: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub val: Option<f64>,
    #[serde(default)]
    pub fy: Option<i32>,
    #[serde(default)]
    pub fp: Option<String>,
    #[serde(default)]
    pub frame: Option<String>,
}

impl FilingEvent {
    pub fn annual_form(&self) -> Option<AnnualForm> {
        AnnualForm::from_form(&self.form)
    }

    /// Accession number with hyphens removed, as used for the archive folder.
    pub fn accession_folder(&self) -> String {
        self.accn.replace('-', "")
    }
}

/// Company-concept document, used here only as an index of filing history.
/// Example: https://data.sec.gov/api/xbrl/companyconcept/CIK0000320193/us-gaap/AccountsPayableCurrent.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisclosureMetadata {
    #[serde(deserialize_with = "cik_from_string_or_number")]
    pub cik: String,
    #[serde(rename = "entityName", default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub units: Units,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Units {
    #[serde(rename = "USD", default)]
    pub usd: Vec<FilingEvent>,
}

impl DisclosureMetadata {
    pub fn events(&self) -> &[FilingEvent] {
        &self.units.usd
    }
}

// The live API sends `cik` as a number; older fixtures carry a string.
fn cik_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cik {
        Text(String),
        Number(u64),
    }

    Ok(match Cik::deserialize(deserializer)? {
        Cik::Text(s) => s,
        Cik::Number(n) => n.to_string(),
    })
}

/// Full text of a fetched filing. Transient: held only while reducing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFilingDocument(pub String);

/// Denoised filing text handed to the assistant as context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReducedFilingText(pub String);

impl ReducedFilingText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ReducedFilingText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
