use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::models::{Config, FeedbackRecord, HealthStatus, NewFeedback, Report, UploadReceipt};

pub mod feedback_client;
pub mod report_client;
pub use feedback_client::FeedbackClient;
pub use report_client::ReportClient;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Failures surfaced by the backend gateways
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid API url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Feedback endpoints of the backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackGateway: Send + Sync {
    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>>;
    async fn get_feedback(&self, id: i64) -> Result<FeedbackRecord>;
    async fn create_feedback(&self, feedback: &NewFeedback) -> Result<FeedbackRecord>;
    async fn delete_feedback(&self, id: i64) -> Result<()>;
    /// Upload a `text,source` CSV as the multipart field `file`
    async fn upload_csv(&self, path: &Path) -> Result<UploadReceipt>;
}

/// Report endpoints of the backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportGateway: Send + Sync {
    /// `Ok(None)` when the backend has no report yet
    async fn latest_report(&self) -> Result<Option<Report>>;
    async fn list_reports(&self) -> Result<Vec<Report>>;
    async fn generate_report(&self) -> Result<Report>;
    async fn send_report_email(&self, email: &str) -> Result<()>;
}

/// Shared HTTP plumbing for the gateway clients
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("feedback-dashboard/0.1")
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.api_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Resolve a path relative to the base URL, e.g. `feedback/`
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ApiError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                source,
            })
    }

    /// Send a request and turn non-success statuses into `ApiError::Status`
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} {}", status, response.url());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status != StatusCode::NOT_FOUND {
                warn!("Backend returned {}: {}", status, body);
            }
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Probe `GET /health`
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint("health")?;
        self.send_json(self.client.get(url)).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // A trailing slash keeps any path prefix when joining endpoints.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|source| ApiError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}
