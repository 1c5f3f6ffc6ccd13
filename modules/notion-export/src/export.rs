//! The export pipeline: one database query, field extraction, CSV write.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Terminator, WriterBuilder};
use notion_client::{NotionClient, Page, PropertyValue};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ExportError, Result};

/// Placeholder written when a page lacks the property entirely.
pub const MISSING_VALUE: &str = "N/D";

pub const EVENT_PROPERTY: &str = "Event";
pub const DATE_PROPERTY: &str = "Date";

const HEADER: [&str; 2] = ["Event", "Data"];

/// One flattened output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    #[serde(rename = "Event")]
    pub event: String,
    #[serde(rename = "Data")]
    pub date: String,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub database_title: String,
    pub rows: usize,
    pub output_path: PathBuf,
}

/// Fetch the first page of query results. Later pages are never requested.
pub async fn fetch_records(client: &NotionClient, database_id: &str) -> Result<Vec<Page>> {
    let resp = client.query_database(database_id).await?;
    if resp.has_more {
        warn!(
            database_id,
            fetched = resp.results.len(),
            "Database has more results than one page; only the first page is exported"
        );
    }
    Ok(resp.results)
}

/// Flatten a page into an `EventRow`.
///
/// An absent property becomes `MISSING_VALUE`. A present property with the
/// wrong type or an empty value is an error, not a placeholder.
pub fn extract_row(page: &Page) -> Result<EventRow> {
    let event = match page.property(EVENT_PROPERTY) {
        None => MISSING_VALUE.to_string(),
        Some(PropertyValue::Title { title }) => {
            let first = title
                .first()
                .ok_or_else(|| malformed(page, EVENT_PROPERTY, "title is empty"))?;
            let text = first
                .text
                .as_ref()
                .ok_or_else(|| malformed(page, EVENT_PROPERTY, "first segment has no text"))?;
            text.content.clone()
        }
        Some(other) => {
            return Err(malformed(
                page,
                EVENT_PROPERTY,
                &format!("expected title, found {}", other.kind()),
            ));
        }
    };

    let date = match page.property(DATE_PROPERTY) {
        None => MISSING_VALUE.to_string(),
        Some(PropertyValue::Date { date: Some(d) }) => d.start.clone(),
        Some(PropertyValue::Date { date: None }) => {
            return Err(malformed(page, DATE_PROPERTY, "date is empty"));
        }
        Some(other) => {
            return Err(malformed(
                page,
                DATE_PROPERTY,
                &format!("expected date, found {}", other.kind()),
            ));
        }
    };

    Ok(EventRow { event, date })
}

fn malformed(page: &Page, property: &str, reason: &str) -> ExportError {
    ExportError::MalformedProperty {
        page_id: page.id.clone(),
        property: property.to_string(),
        reason: reason.to_string(),
    }
}

/// Write `rows` to `path`, truncating any existing file. The header is
/// always written, so an empty export still yields `Event,Data`.
pub fn write_csv(rows: &[EventRow], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(file);

    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Verify the database, fetch its first page, and write the CSV.
///
/// Every row is extracted before the file is opened, so a malformed page
/// leaves any previous output untouched.
pub async fn run_export(config: &Config) -> Result<ExportSummary> {
    let client = NotionClient::new(config.notion_token.clone()).with_base_url(&config.api_base_url);

    let database = client.retrieve_database(&config.database_id).await?;
    let database_title = database.display_title().to_string();
    info!(database_id = %config.database_id, title = %database_title, "Notion database reachable");

    let pages = fetch_records(&client, &config.database_id).await?;
    info!(count = pages.len(), "Fetched pages");

    let rows = pages.iter().map(extract_row).collect::<Result<Vec<_>>>()?;

    write_csv(&rows, &config.output_path)?;
    info!(rows = rows.len(), path = %config.output_path.display(), "CSV written");

    Ok(ExportSummary {
        database_title,
        rows: rows.len(),
        output_path: config.output_path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(json: &str) -> Page {
        serde_json::from_str(json).expect("invalid test JSON")
    }

    #[test]
    fn title_and_date_are_extracted() {
        let row = extract_row(&page(
            r#"{"id": "p1", "properties": {
                "Event": {"type": "title", "title": [
                    {"type": "text", "text": {"content": "Launch"}, "plain_text": "Launch"},
                    {"type": "text", "text": {"content": " party"}, "plain_text": " party"}
                ]},
                "Date": {"type": "date", "date": {"start": "2025-01-01", "end": "2025-01-02"}}
            }}"#,
        ))
        .unwrap();

        assert_eq!(
            row,
            EventRow {
                event: "Launch".to_string(),
                date: "2025-01-01".to_string(),
            }
        );
    }

    #[test]
    fn absent_properties_become_placeholder() {
        let row = extract_row(&page(r#"{"id": "p1", "properties": {}}"#)).unwrap();
        assert_eq!(row.event, MISSING_VALUE);
        assert_eq!(row.date, MISSING_VALUE);
    }

    #[test]
    fn empty_title_is_an_error() {
        let err = extract_row(&page(
            r#"{"id": "p1", "properties": {"Event": {"type": "title", "title": []}}}"#,
        ))
        .unwrap_err();

        match err {
            ExportError::MalformedProperty { page_id, property, .. } => {
                assert_eq!(page_id, "p1");
                assert_eq!(property, "Event");
            }
            other => panic!("expected MalformedProperty, got {other:?}"),
        }
    }

    #[test]
    fn mention_segment_without_text_is_an_error() {
        let err = extract_row(&page(
            r#"{"id": "p1", "properties": {"Event": {"type": "title", "title": [
                {"type": "mention", "mention": {"type": "date"}, "plain_text": "@Today"}
            ]}}}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ExportError::MalformedProperty { .. }));
    }

    #[test]
    fn null_date_is_an_error() {
        let err = extract_row(&page(
            r#"{"id": "p1", "properties": {"Date": {"type": "date", "date": null}}}"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("date is empty"), "{err}");
    }

    #[test]
    fn wrong_property_type_is_an_error() {
        let err = extract_row(&page(
            r#"{"id": "p1", "properties": {"Event": {"type": "rich_text", "rich_text": []}}}"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("expected title, found rich_text"), "{err}");
    }
}
