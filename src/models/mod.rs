use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One customer feedback entry plus the enrichment the backend attaches to it.
///
/// Every derived field is optional: a freshly submitted record stays in a
/// "processing" state until the backend pipeline has classified and scored it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub urgency: Option<i64>,
    #[serde(default)]
    pub impact: Option<i64>,
    #[serde(default)]
    pub priority_score: Option<f64>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// True while the backend has not yet filled in the derived fields
    pub fn is_processing(&self) -> bool {
        self.sentiment.is_none()
            || self.theme.is_none()
            || self.urgency.is_none()
            || self.impact.is_none()
            || self.priority_score.is_none()
    }
}

/// Sentiment label assigned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    #[serde(other)]
    Unknown,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a piece of feedback came from, as offered by the submission form.
/// Records coming back from the backend keep `source` as a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSource {
    #[default]
    Web,
    Email,
    Survey,
    Support,
    Social,
}

impl FeedbackSource {
    pub const ALL: [FeedbackSource; 5] = [
        FeedbackSource::Web,
        FeedbackSource::Email,
        FeedbackSource::Survey,
        FeedbackSource::Support,
        FeedbackSource::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackSource::Web => "web",
            FeedbackSource::Email => "email",
            FeedbackSource::Survey => "survey",
            FeedbackSource::Support => "support",
            FeedbackSource::Social => "social",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackSource::Web => "Web",
            FeedbackSource::Email => "Email",
            FeedbackSource::Survey => "Survey",
            FeedbackSource::Support => "Support",
            FeedbackSource::Social => "Social Media",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::str::FromStr for FeedbackSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "web" | "manual" => Ok(FeedbackSource::Web),
            "email" => Ok(FeedbackSource::Email),
            "survey" => Ok(FeedbackSource::Survey),
            "support" => Ok(FeedbackSource::Support),
            "social" => Ok(FeedbackSource::Social),
            other => Err(anyhow::anyhow!("Unknown feedback source: {}", other)),
        }
    }
}

/// Body of `POST /feedback/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFeedback {
    pub text: String,
    pub source: FeedbackSource,
}

/// Generated Markdown priority report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub generated_at: DateTime<Utc>,
    pub markdown_report: String,
}

/// Body of `POST /report/send-to-email`
#[derive(Debug, Clone, Serialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Response of `POST /feedback/upload-csv`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub database: String,
    pub llm_configured: bool,
}

/// Parse a backend timestamp.
///
/// The backend emits either RFC 3339 with an offset or a naive ISO-8601 value
/// (sqlite `CURRENT_TIMESTAMP` style); naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

/// Light/dark palette selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(anyhow::anyhow!("Unknown theme: {} (expected light or dark)", other)),
        }
    }
}

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub auto_report_threshold: usize,
    pub theme: ThemeMode,
    pub log_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            auto_report_threshold: 4,
            theme: ThemeMode::Dark,
            log_path: "feedback_dashboard.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Config::default();
        let theme = match std::env::var("DASHBOARD_THEME") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.theme,
        };

        Ok(Config {
            api_url: std::env::var("FEEDBACK_API_URL")
                .or_else(|_| std::env::var("NEXT_PUBLIC_API_URL"))
                .unwrap_or(defaults.api_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            auto_report_threshold: std::env::var("AUTO_REPORT_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.auto_report_threshold),
            theme,
            log_path: std::env::var("DASHBOARD_LOG_PATH").unwrap_or(defaults.log_path),
        })
    }
}
