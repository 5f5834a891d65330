use crate::models::FeedbackRecord;

/// Priority bucket used to colour scatter points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityBand {
    High,
    Medium,
    Low,
    Unscored,
}

impl PriorityBand {
    pub const HIGH_THRESHOLD: f64 = 8.0;
    pub const MEDIUM_THRESHOLD: f64 = 6.0;

    /// Lower bound of each band is inclusive
    pub fn classify(priority: Option<f64>) -> Self {
        match priority {
            None => PriorityBand::Unscored,
            Some(p) if p >= Self::HIGH_THRESHOLD => PriorityBand::High,
            Some(p) if p >= Self::MEDIUM_THRESHOLD => PriorityBand::Medium,
            Some(_) => PriorityBand::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityBand::High => "High (>= 8)",
            PriorityBand::Medium => "Medium (6-8)",
            PriorityBand::Low => "Low (< 6)",
            PriorityBand::Unscored => "Unscored",
        }
    }
}

/// One point on the urgency vs impact chart
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint<'a> {
    pub urgency: i64,
    pub impact: i64,
    pub theme: Option<&'a str>,
    pub priority: Option<f64>,
}

impl ScatterPoint<'_> {
    pub fn band(&self) -> PriorityBand {
        PriorityBand::classify(self.priority)
    }
}

/// Points for the urgency vs impact chart.
///
/// A record is plotted only if urgency and impact are both present and nonzero.
pub fn scatter_series(records: &[FeedbackRecord]) -> impl Iterator<Item = ScatterPoint<'_>> + '_ {
    records.iter().filter_map(|record| match (record.urgency, record.impact) {
        (Some(urgency), Some(impact)) if urgency != 0 && impact != 0 => Some(ScatterPoint {
            urgency,
            impact,
            theme: record.theme.as_deref(),
            priority: record.priority_score,
        }),
        _ => None,
    })
}

/// Per-theme bar of the distribution chart
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeBucket {
    /// `None` groups records the backend has not classified yet
    pub theme: Option<String>,
    pub count: usize,
    pub avg_priority: f64,
}

impl ThemeBucket {
    pub fn display_theme(&self) -> &str {
        self.theme.as_deref().unwrap_or("Processing...")
    }
}

/// Group records by theme in first-seen order with a running priority mean
pub fn theme_aggregate(records: &[FeedbackRecord]) -> Vec<ThemeBucket> {
    let mut buckets: Vec<ThemeBucket> = Vec::new();

    for record in records {
        let score = record.priority_score.unwrap_or(0.0);
        match buckets.iter_mut().find(|b| b.theme == record.theme) {
            Some(bucket) => {
                bucket.count += 1;
                bucket.avg_priority =
                    (bucket.avg_priority * (bucket.count - 1) as f64 + score) / bucket.count as f64;
            }
            None => buckets.push(ThemeBucket {
                theme: record.theme.clone(),
                count: 1,
                avg_priority: score,
            }),
        }
    }

    buckets
}
