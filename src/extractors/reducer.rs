// src/extractors/reducer.rs

// --- Imports ---
use crate::config::ReduceMode;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// --- Constants ---
const DOCUMENT_OPEN: &str = "<DOCUMENT>";
const DOCUMENT_CLOSE: &str = "</DOCUMENT>";
// Lines this short (after trimming) are markup remnants and page noise.
const MIN_LINE_CHARS: usize = 5;
const TABLE_TAGS: [&str; 6] = ["table", "tbody", "thead", "tr", "th", "td"];

// --- Regex Patterns (Lazy Static) ---
// Any tag, comment or declaration. Group 1 is the closing slash, group 2 the
// tag name when the tag starts with one.
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*(/?)\s*([A-Za-z][A-Za-z0-9:._-]*)?[^>]*>")
        .expect("Failed to compile TAG_RE")
});

// Filing-platform boilerplate and XBRL wrapper markers that survive tag stripping.
static BOILERPLATE_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Platform attribution phrase
        r"(?i)document\s+created\s+using\s+(?:the\s+)?(?:wdesk|workiva)",
        // Platform copyright phrase
        r"(?i)copyright\s+(?:©\s*|\(c\)\s*)?\d{4}\s+workiva(?:,?\s+inc\.?)?",
        // XBRL wrappers, raw or escaped
        r"(?i)</?\s*xbrl\s*>",
        r"(?i)&lt;/?\s*xbrl\s*&gt;",
    ]
    .iter()
    .filter_map(|pat| Regex::new(pat).ok())
    .collect()
});

// One or more stacked `amp;` escapes collapse to a single `&`.
static AMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)&(?:amp;)+").expect("Failed to compile AMP_RE")
});

static NBSP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)&nbsp;|&#160;|&#xa0;").expect("Failed to compile NBSP_RE")
});

// --- Main Reducer Structure ---

/// Best-effort denoiser for one EDGAR submission file.
///
/// This is regex-based, not an SGML/HTML parser: malformed or deeply nested
/// markup (e.g. a `>` inside a comment) is handled on a best-effort basis.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentReducer {
    mode: ReduceMode,
}

impl DocumentReducer {
    pub fn new(mode: ReduceMode) -> Self {
        Self { mode }
    }

    /// Reduces a raw submission to condensed text.
    ///
    /// Returns `None` when the first `<DOCUMENT>` / `</DOCUMENT>` pair is
    /// missing or out of order. Otherwise returns the cleaned text, which may
    /// legitimately be empty.
    pub fn reduce(&self, raw: &str) -> Option<String> {
        // 1. Bound to the first document of the submission
        let Some(document) = first_document(raw) else {
            tracing::warn!("No well-formed <DOCUMENT> block in filing ({} bytes)", raw.len());
            return None;
        };
        tracing::debug!("Bounded first document: {} of {} bytes", document.len(), raw.len());

        // 2. Strip markup
        let stripped = match self.mode {
            ReduceMode::Text => TAG_RE.replace_all(document, "").into_owned(),
            ReduceMode::Tables => strip_tags_except_tables(document),
        };

        // 3. Boilerplate and entities
        let cleaned = remove_boilerplate(&stripped);

        // 4. Short-line filter
        let reduced = drop_short_lines(&cleaned);

        tracing::info!(
            "Reduced filing from {} to {} bytes ({:?} mode)",
            raw.len(),
            reduced.len(),
            self.mode
        );
        Some(reduced)
    }
}

/// Text-only reduction: every tag is removed.
pub fn reduce_to_text(raw: &str) -> Option<String> {
    DocumentReducer::new(ReduceMode::Text).reduce(raw)
}

/// Table-preserving reduction: bare table tags survive, all else is removed.
pub fn reduce_preserving_tables(raw: &str) -> Option<String> {
    DocumentReducer::new(ReduceMode::Tables).reduce(raw)
}

// --- Helper Functions ---

/// Substring from the first opening marker through the first closing marker.
fn first_document(raw: &str) -> Option<&str> {
    let start = raw.find(DOCUMENT_OPEN)?;
    let end = raw.find(DOCUMENT_CLOSE)?;
    if start >= end {
        return None;
    }
    Some(&raw[start..end + DOCUMENT_CLOSE.len()])
}

/// Removes all tags except table structure, which is kept with attributes dropped.
fn strip_tags_except_tables(html: &str) -> String {
    TAG_RE
        .replace_all(html, |caps: &Captures| {
            let Some(name) = caps.get(2) else {
                return String::new();
            };
            let name = name.as_str().to_ascii_lowercase();
            if !TABLE_TAGS.contains(&name.as_str()) {
                return String::new();
            }
            // `<td/>` becomes an empty cell, never a dangling open tag
            let self_closing = caps[0].trim_end_matches('>').trim_end().ends_with('/');
            match (&caps[1], self_closing) {
                ("/", _) => format!("</{}>", name),
                (_, true) => format!("<{0}></{0}>", name),
                _ => format!("<{}>", name),
            }
        })
        .into_owned()
}

fn remove_boilerplate(text: &str) -> String {
    // Unescape `&amp;` first so a second reduction finds nothing left to decode.
    // `&lt;` stays escaped so no new markup appears.
    let mut cleaned = AMP_RE.replace_all(text, "&").into_owned();
    for re in BOILERPLATE_RE.iter() {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }
    NBSP_RE.replace_all(&cleaned, " ").into_owned()
}

fn drop_short_lines(text: &str) -> String {
    text.lines()
        .filter(|line| line.trim().chars().count() > MIN_LINE_CHARS)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SUBMISSION: &str = r#"<SEC-DOCUMENT>0000320193-23-000106.txt : 20231103
<SEC-HEADER>0000320193-23-000106.hdr.sgml : 20231103
CONFORMED SUBMISSION TYPE:	10-K
</SEC-HEADER>
<DOCUMENT>
<TYPE>10-K
<SEQUENCE>1
<FILENAME>aapl-20230930.htm
<TEXT>
<XBRL>
<?xml version='1.0' encoding='ASCII'?>
<!-- Document created using Wdesk -->
<html><body>
<div style="font-weight:700">Apple Inc.</div>
<p>The Company designs, manufactures and markets smartphones&nbsp;and computers.</p>
<table style="border:1px"><tr class="r"><td>Net sales</td><td>383,285</td></tr></table>
<p>Research &amp; development expense increased.</p>
<p>Copyright 2023 Workiva</p>
<p>12</p>
</body></html>
</XBRL>
</TEXT>
</DOCUMENT>
<DOCUMENT>
<TYPE>EX-21.1
<TEXT>Subsidiaries of the registrant listed here.</TEXT>
</DOCUMENT>
</SEC-DOCUMENT>"#;

    #[test]
    fn test_missing_markers_return_none() {
        assert!(reduce_to_text("no markers at all, just prose that is long").is_none());
        assert!(reduce_to_text("<DOCUMENT> opening only, never closed").is_none());
        assert!(reduce_to_text("closing only </DOCUMENT> here").is_none());
        assert!(reduce_preserving_tables("<html><table><tr><td>1</td></tr></table></html>").is_none());
    }

    #[test]
    fn test_closing_before_opening_returns_none() {
        let raw = "</DOCUMENT> stray close first <DOCUMENT> then an open";
        assert!(reduce_to_text(raw).is_none());
        assert!(reduce_preserving_tables(raw).is_none());
    }

    #[test]
    fn test_text_reduction_strips_markup_and_noise() {
        let reduced = reduce_to_text(SAMPLE_SUBMISSION).expect("markers present");

        assert!(reduced.contains("The Company designs, manufactures and markets smartphones and computers."));
        assert!(reduced.contains("Research & development expense increased."));
        assert!(reduced.contains("Net sales383,285"));
        assert!(!reduced.contains('<'), "no markup may survive: {}", reduced);
        assert!(!reduced.to_lowercase().contains("workiva"));
        assert!(!reduced.contains("EX-21.1"), "only the first document is kept");
        // Short lines such as "10-K", "1" and "12" are dropped
        assert!(reduced.lines().all(|line| line.trim().chars().count() > 5));
    }

    #[test]
    fn test_table_reduction_keeps_bare_table_tags() {
        let reduced = reduce_preserving_tables(SAMPLE_SUBMISSION).expect("markers present");

        assert!(reduced.contains("<table><tr><td>Net sales</td><td>383,285</td></tr></table>"));
        assert!(!reduced.contains("<p>"));
        assert!(!reduced.contains("<div"));
        assert!(!reduced.contains("style="));
        assert!(!reduced.contains("<TYPE>"));
    }

    #[test]
    fn test_table_fixture_from_minimal_document() {
        let raw = r#"<DOCUMENT><table style="x"><tr><td>42</td></tr></table></DOCUMENT>"#;
        let reduced = reduce_preserving_tables(raw).expect("markers present");
        assert!(reduced.contains("<table><tr><td>42</td></tr>"));
        assert_eq!(reduced, "<table><tr><td>42</td></tr></table>");
    }

    #[test]
    fn test_table_tag_match_is_case_insensitive() {
        let raw = "<DOCUMENT>\n<TABLE width=\"100%\"><THEAD><TR><TH align=left>Total assets</TH></TR></THEAD><TBODY><TR><TD>352,583</TD></TR></TBODY></TABLE>\n</DOCUMENT>";
        let reduced = reduce_preserving_tables(raw).expect("markers present");
        assert_eq!(
            reduced,
            "<table><thead><tr><th>Total assets</th></tr></thead><tbody><tr><td>352,583</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_lookalike_tags_are_not_preserved() {
        let raw = "<DOCUMENT>\n<tdx>cell-ish</tdx><table-wrap>Revenue grew strongly</table-wrap>\n</DOCUMENT>";
        let reduced = reduce_preserving_tables(raw).expect("markers present");
        assert_eq!(reduced, "cell-ishRevenue grew strongly");
    }

    #[test]
    fn test_escaped_xbrl_markers_are_removed() {
        let raw = "<DOCUMENT>\n&lt;XBRL&gt;Operating income rose sharply&lt;/xbrl&gt;\n</DOCUMENT>";
        let reduced = reduce_to_text(raw).expect("markers present");
        assert_eq!(reduced, "Operating income rose sharply");
    }

    #[test]
    fn test_reduction_is_idempotent_on_reduced_text() {
        let once = reduce_to_text(SAMPLE_SUBMISSION).expect("markers present");
        let twice = reduce_to_text(&format!("<DOCUMENT>\n{}\n</DOCUMENT>", once))
            .expect("markers present");
        assert_eq!(once, twice);
        assert_eq!(drop_short_lines(&once), once);
    }

    #[test]
    fn test_boilerplate_removal_keeps_following_content() {
        let raw = "<DOCUMENT>\n<p>Copyright 2023 Workiva</p><p>Total net sales were 383,285 million in fiscal 2023.</p>\n</DOCUMENT>";
        let reduced = reduce_to_text(raw).expect("markers present");
        assert_eq!(reduced, "Total net sales were 383,285 million in fiscal 2023.");

        let raw = "<DOCUMENT>\nDocument created using Workiva Revenue by segment is shown below.\n</DOCUMENT>";
        let reduced = reduce_to_text(raw).expect("markers present");
        assert_eq!(reduced, "Revenue by segment is shown below.");

        let raw = "<DOCUMENT>\nCopyright 2023 Workiva, Inc. Net income rose in every quarter.\n</DOCUMENT>";
        let reduced = reduce_preserving_tables(raw).expect("markers present");
        assert_eq!(reduced, "Net income rose in every quarter.");
    }

    #[test]
    fn test_double_escaped_ampersand_is_stable() {
        let raw = "<DOCUMENT>\nResearch &amp;amp; development spending rose\n</DOCUMENT>";
        let once = reduce_to_text(raw).expect("markers present");
        assert_eq!(once, "Research & development spending rose");

        let twice = reduce_to_text(&format!("<DOCUMENT>\n{}\n</DOCUMENT>", once))
            .expect("markers present");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_self_closing_table_tags_become_empty_cells() {
        let raw = "<DOCUMENT>\n<table><tr><td/><td>Net sales 42</td></tr><tr /></table>\n</DOCUMENT>";
        let reduced = reduce_preserving_tables(raw).expect("markers present");
        assert_eq!(
            reduced,
            "<table><tr><td></td><td>Net sales 42</td></tr><tr></tr></table>"
        );
    }

    #[test]
    fn test_document_with_only_short_lines_reduces_to_empty() {
        let raw = "<DOCUMENT>\n<p>1</p>\n<p>ab</p>\n</DOCUMENT>";
        assert_eq!(reduce_to_text(raw), Some(String::new()));
    }
}
