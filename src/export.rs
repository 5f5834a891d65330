use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::models::FeedbackRecord;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: i64,
    text: &'a str,
    source: &'a str,
    sentiment: Option<&'static str>,
    theme: Option<&'a str>,
    summary: Option<&'a str>,
    urgency: Option<i64>,
    impact: Option<i64>,
    priority_score: Option<f64>,
    created_at: String,
}

impl<'a> From<&'a FeedbackRecord> for ExportRow<'a> {
    fn from(record: &'a FeedbackRecord) -> Self {
        Self {
            id: record.id,
            text: &record.text,
            source: &record.source,
            sentiment: record.sentiment.map(|s| s.as_str()),
            theme: record.theme.as_deref(),
            summary: record.summary.as_deref(),
            urgency: record.urgency,
            impact: record.impact,
            priority_score: record.priority_score,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Write rows in the given order as CSV with a header line
pub fn write_csv<W: Write>(writer: W, records: &[&FeedbackRecord]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(ExportRow::from(*record))?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

/// Export rows to a CSV file, replacing it if present
pub fn export_to_file(path: &Path, records: &[&FeedbackRecord]) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, records)
}
