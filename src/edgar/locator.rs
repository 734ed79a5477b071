// src/edgar/locator.rs
use crate::config::LocatorOrdering;
use crate::edgar::models::{DisclosureMetadata, FilerId, FilingEvent};
use chrono::NaiveDate;

/// Finds the most recent annual report (10-K or 10-K/A) in the metadata.
///
/// With [`LocatorOrdering::AppendOrder`] the event list is assumed to be
/// append-only, newest last, and is scanned from the end; the first match
/// wins and `filed` dates are never compared. If the source ever returns
/// events out of order the answer is silently wrong, so debug builds log a
/// warning when dates decrease. [`LocatorOrdering::Chronological`] ranks the
/// annual events by `filed` date instead, ties broken by position.
pub fn locate_most_recent_annual_filing(
    metadata: &DisclosureMetadata,
    ordering: LocatorOrdering,
) -> Option<&FilingEvent> {
    let events = metadata.events();

    let found = match ordering {
        LocatorOrdering::AppendOrder => {
            if cfg!(debug_assertions) {
                warn_if_out_of_order(events);
            }
            events.iter().rev().find(|event| event.annual_form().is_some())
        }
        LocatorOrdering::Chronological => events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.annual_form().is_some())
            .max_by_key(|(idx, event)| (parse_filed(&event.filed), *idx))
            .map(|(_, event)| event),
    };

    match found {
        Some(event) => tracing::info!(
            "Located {} filed {} (accession {})",
            event.form,
            event.filed,
            event.accn
        ),
        None => tracing::warn!(
            "No 10-K or 10-K/A among {} disclosure events for CIK {}",
            events.len(),
            metadata.cik
        ),
    }
    found
}

/// Builds the archive URL of the full submission text file:
/// `{base}/Archives/edgar/data/{cik}/{accession without hyphens}/{accession}.txt`
pub fn build_document_url(archive_base_url: &str, filer: FilerId, event: &FilingEvent) -> String {
    format!(
        "{}/Archives/edgar/data/{}/{}/{}.txt",
        archive_base_url.trim_end_matches('/'),
        filer,
        event.accession_folder(),
        event.accn
    )
}

fn parse_filed(filed: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(filed.trim(), "%Y-%m-%d").ok()
}

fn warn_if_out_of_order(events: &[FilingEvent]) {
    let mut previous: Option<(NaiveDate, &FilingEvent)> = None;
    for event in events {
        let Some(date) = parse_filed(&event.filed) else {
            continue;
        };
        if let Some((prev_date, prev)) = previous {
            if date < prev_date {
                tracing::warn!(
                    "Disclosure events are not in filing order: {} ({}) follows {} ({}); reverse scan may pick a stale filing",
                    event.accn,
                    event.filed,
                    prev.accn,
                    prev.filed
                );
                return;
            }
        }
        previous = Some((date, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::models::Units;

    fn event(form: &str, filed: &str, accn: &str) -> FilingEvent {
        FilingEvent {
            form: form.to_string(),
            filed: filed.to_string(),
            accn: accn.to_string(),
            end: None,
            val: None,
            fy: None,
            fp: None,
            frame: None,
        }
    }

    fn metadata(events: Vec<FilingEvent>) -> DisclosureMetadata {
        DisclosureMetadata {
            cik: "320193".to_string(),
            entity_name: Some("Apple Inc.".to_string()),
            units: Units { usd: events },
        }
    }

    #[test]
    fn test_no_annual_forms_returns_none() {
        let md = metadata(vec![
            event("10-Q", "2023-05-05", "0000320193-23-000064"),
            event("10-Q", "2023-08-04", "0000320193-23-000077"),
            event("8-K", "2023-08-10", "0000320193-23-000080"),
        ]);
        assert!(locate_most_recent_annual_filing(&md, LocatorOrdering::AppendOrder).is_none());
        assert!(locate_most_recent_annual_filing(&md, LocatorOrdering::Chronological).is_none());
    }

    #[test]
    fn test_empty_metadata_returns_none() {
        let md = metadata(Vec::new());
        assert!(locate_most_recent_annual_filing(&md, LocatorOrdering::AppendOrder).is_none());
    }

    #[test]
    fn test_append_order_picks_highest_index_regardless_of_dates() {
        // The last annual entry carries an older date on purpose.
        let md = metadata(vec![
            event("10-K", "2023-11-03", "0000320193-23-000106"),
            event("10-Q", "2024-02-02", "0000320193-24-000006"),
            event("10-K/A", "2019-01-15", "0000320193-19-000010"),
            event("10-Q", "2024-05-03", "0000320193-24-000069"),
        ]);
        let found = locate_most_recent_annual_filing(&md, LocatorOrdering::AppendOrder)
            .expect("annual filing present");
        assert_eq!(found.accn, "0000320193-19-000010");
    }

    #[test]
    fn test_chronological_picks_latest_filed_date() {
        let md = metadata(vec![
            event("10-K", "2023-11-03", "0000320193-23-000106"),
            event("10-K/A", "2019-01-15", "0000320193-19-000010"),
            event("10-Q", "2024-05-03", "0000320193-24-000069"),
        ]);
        let found = locate_most_recent_annual_filing(&md, LocatorOrdering::Chronological)
            .expect("annual filing present");
        assert_eq!(found.accn, "0000320193-23-000106");
    }

    #[test]
    fn test_chronological_ties_fall_back_to_position() {
        let md = metadata(vec![
            event("10-K", "2023-11-03", "0000320193-23-000106"),
            event("10-K", "2023-11-03", "0000320193-23-000107"),
            event("10-K", "not-a-date", "0000320193-23-000108"),
        ]);
        let found = locate_most_recent_annual_filing(&md, LocatorOrdering::Chronological)
            .expect("annual filing present");
        assert_eq!(found.accn, "0000320193-23-000107");
    }

    #[test]
    fn test_build_document_url() {
        let filing = event("10-K", "2023-11-03", "0000320193-23-000106");
        let url = build_document_url("https://www.sec.gov", FilerId::new(320193), &filing);
        assert_eq!(
            url,
            "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/0000320193-23-000106.txt"
        );
        assert!(url.ends_with("/320193/000032019323000106/0000320193-23-000106.txt"));
    }

    #[test]
    fn test_build_document_url_tolerates_trailing_slash() {
        let filing = event("10-K", "2023-11-03", "0000320193-23-000106");
        let url = build_document_url("http://localhost:9000/", FilerId::new(320193), &filing);
        assert!(url.starts_with("http://localhost:9000/Archives/edgar/data/320193/"));
    }
}
