//! Common test utilities and helpers

use chrono::{DateTime, TimeZone, Utc};
use feedback_dashboard::api::ApiClient;
use feedback_dashboard::models::Config;
use wiremock::MockServer;

/// Test data utilities
pub mod test_data {
    use super::*;
    use feedback_dashboard::models::{FeedbackRecord, Report, Sentiment};
    use serde_json::{json, Value};

    pub fn timestamp(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 9, 30, 0).unwrap()
    }

    /// Fully scored record
    pub fn create_scored_record(id: i64, theme: &str, urgency: i64, impact: i64, priority: f64) -> FeedbackRecord {
        FeedbackRecord {
            id,
            text: format!("Feedback item {}", id),
            source: "web".to_string(),
            sentiment: Some(Sentiment::Negative),
            theme: Some(theme.to_string()),
            summary: Some(format!("Summary {}", id)),
            justification: Some("Affects many users".to_string()),
            urgency: Some(urgency),
            impact: Some(impact),
            priority_score: Some(priority),
            created_at: timestamp((id % 28) as u32 + 1),
        }
    }

    /// Record the backend has not scored yet
    pub fn create_processing_record(id: i64) -> FeedbackRecord {
        FeedbackRecord {
            id,
            text: format!("Unscored item {}", id),
            source: "email".to_string(),
            sentiment: None,
            theme: None,
            summary: None,
            justification: None,
            urgency: None,
            impact: None,
            priority_score: None,
            created_at: timestamp(1),
        }
    }

    pub fn create_report(id: i64) -> Report {
        Report {
            id,
            generated_at: timestamp(15),
            markdown_report: "# Priority Report\n## Top Issues\n- **Checkout** timeouts".to_string(),
        }
    }

    /// Backend JSON for a feedback record, naive timestamp as the backend sends it
    pub fn feedback_json(id: i64, priority: Option<f64>) -> Value {
        json!({
            "id": id,
            "text": format!("Feedback item {}", id),
            "source": "support",
            "sentiment": priority.map(|_| "negative"),
            "theme": priority.map(|_| "Bug Report"),
            "summary": priority.map(|_| "Short summary"),
            "justification": null,
            "urgency": priority.map(|_| 8),
            "impact": priority.map(|_| 7),
            "priority_score": priority,
            "created_at": "2025-03-04T10:11:12.345678"
        })
    }

    pub fn report_json(id: i64) -> Value {
        json!({
            "id": id,
            "generated_at": "2025-03-05T08:00:00",
            "markdown_report": "# Priority Report\n- Fix login"
        })
    }
}

/// Mock backend helpers
pub mod backend {
    use super::*;

    pub fn config_for(server: &MockServer) -> Config {
        Config {
            api_url: server.uri(),
            request_timeout_secs: 5,
            ..Config::default()
        }
    }

    pub fn api_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&config_for(server)).expect("client should build for mock server")
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::{debug, info};

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("feedback_dashboard=debug,main=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }

    /// Log test data
    pub fn log_test_data<T: std::fmt::Debug>(label: &str, data: &T) {
        debug!("📊 {}: {:?}", label, data);
    }
}
