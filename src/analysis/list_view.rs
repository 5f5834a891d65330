use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::models::FeedbackRecord;

/// Columns the feedback table can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    Text,
    Source,
    Sentiment,
    Theme,
    Summary,
    Urgency,
    Impact,
    PriorityScore,
    CreatedAt,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Id => "ID",
            SortKey::Text => "Feedback",
            SortKey::Source => "Source",
            SortKey::Sentiment => "Sentiment",
            SortKey::Theme => "Theme",
            SortKey::Summary => "Summary",
            SortKey::Urgency => "Urgency",
            SortKey::Impact => "Impact",
            SortKey::PriorityScore => "Priority",
            SortKey::CreatedAt => "Created",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "id" => Ok(SortKey::Id),
            "text" => Ok(SortKey::Text),
            "source" => Ok(SortKey::Source),
            "sentiment" => Ok(SortKey::Sentiment),
            "theme" => Ok(SortKey::Theme),
            "summary" => Ok(SortKey::Summary),
            "urgency" => Ok(SortKey::Urgency),
            "impact" => Ok(SortKey::Impact),
            "priority" | "priority_score" => Ok(SortKey::PriorityScore),
            "created" | "created_at" => Ok(SortKey::CreatedAt),
            other => Err(anyhow::anyhow!("Unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// View-local ordering of the feedback table.
///
/// With no key set the table falls back to descending priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Request a sort on `key`: flips direction on the active key, otherwise
    /// switches to `key` starting descending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Descending;
        }
    }

    /// The key and direction actually applied, including the default fallback
    pub fn effective(&self) -> (SortKey, SortDirection) {
        match self.key {
            Some(key) => (key, self.direction),
            None => (SortKey::PriorityScore, SortDirection::Descending),
        }
    }

    pub fn indicator_for(&self, key: SortKey) -> Option<&'static str> {
        (self.key == Some(key)).then(|| self.direction.indicator())
    }
}

enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
    Time(DateTime<Utc>),
}

fn sort_value(record: &FeedbackRecord, key: SortKey) -> SortValue<'_> {
    match key {
        SortKey::Id => SortValue::Number(record.id as f64),
        SortKey::Urgency => SortValue::Number(record.urgency.unwrap_or(0) as f64),
        SortKey::Impact => SortValue::Number(record.impact.unwrap_or(0) as f64),
        SortKey::PriorityScore => SortValue::Number(record.priority_score.unwrap_or(0.0)),
        SortKey::CreatedAt => SortValue::Time(record.created_at),
        SortKey::Text => SortValue::Text(&record.text),
        SortKey::Source => SortValue::Text(&record.source),
        SortKey::Sentiment => SortValue::Text(record.sentiment.map(|s| s.as_str()).unwrap_or("")),
        SortKey::Theme => SortValue::Text(record.theme.as_deref().unwrap_or("")),
        SortKey::Summary => SortValue::Text(record.summary.as_deref().unwrap_or("")),
    }
}

fn compare_records(a: &FeedbackRecord, b: &FeedbackRecord, key: SortKey) -> Ordering {
    match (sort_value(a, key), sort_value(b, key)) {
        (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(&y),
        (SortValue::Text(x), SortValue::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (SortValue::Time(x), SortValue::Time(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

/// Ordered view over `records` without touching the source slice.
///
/// The sort is stable, so records that compare equal keep their input order in
/// either direction.
pub fn sorted_view<'a>(records: &'a [FeedbackRecord], sort: &SortState) -> Vec<&'a FeedbackRecord> {
    let (key, direction) = sort.effective();
    let mut view: Vec<&FeedbackRecord> = records.iter().collect();
    view.sort_by(|a, b| {
        let ord = compare_records(a, b, key);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    view
}

/// Summary cards shown above the feedback table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryStats {
    pub total: usize,
    pub avg_urgency: f64,
    pub avg_impact: f64,
}

impl SummaryStats {
    pub fn display_avg_urgency(&self) -> String {
        format!("{:.1}", self.avg_urgency)
    }

    pub fn display_avg_impact(&self) -> String {
        format!("{:.1}", self.avg_impact)
    }
}

/// Totals and averages over every record.
///
/// Averages divide by the full record count, so records still being processed
/// pull the mean toward zero.
pub fn aggregate_stats(records: &[FeedbackRecord]) -> SummaryStats {
    let total = records.len();
    if total == 0 {
        return SummaryStats::default();
    }

    let urgency_sum: i64 = records.iter().map(|r| r.urgency.unwrap_or(0)).sum();
    let impact_sum: i64 = records.iter().map(|r| r.impact.unwrap_or(0)).sum();

    SummaryStats {
        total,
        avg_urgency: urgency_sum as f64 / total as f64,
        avg_impact: impact_sum as f64 / total as f64,
    }
}
