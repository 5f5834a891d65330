use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use tracing::info;

use super::{ApiClient, ApiError, FeedbackGateway, Result};
use crate::models::{Config, FeedbackRecord, NewFeedback, UploadReceipt};

/// HTTP client for the `/feedback` routes
#[derive(Debug, Clone)]
pub struct FeedbackClient {
    api: ApiClient,
}

impl FeedbackClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_api(ApiClient::new(config)?))
    }

    pub fn with_api(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FeedbackGateway for FeedbackClient {
    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>> {
        let url = self.api.endpoint("feedback/")?;
        let records: Vec<FeedbackRecord> = self.api.send_json(self.api.http().get(url)).await?;
        info!("Fetched {} feedback records", records.len());
        Ok(records)
    }

    async fn get_feedback(&self, id: i64) -> Result<FeedbackRecord> {
        let url = self.api.endpoint(&format!("feedback/{}", id))?;
        self.api.send_json(self.api.http().get(url)).await
    }

    async fn create_feedback(&self, feedback: &NewFeedback) -> Result<FeedbackRecord> {
        let url = self.api.endpoint("feedback/")?;
        let record: FeedbackRecord = self
            .api
            .send_json(self.api.http().post(url).json(feedback))
            .await?;
        info!("Submitted feedback {} from {}", record.id, feedback.source.as_str());
        Ok(record)
    }

    async fn delete_feedback(&self, id: i64) -> Result<()> {
        let url = self.api.endpoint(&format!("feedback/{}", id))?;
        self.api.send(self.api.http().delete(url)).await?;
        info!("Deleted feedback {}", id);
        Ok(())
    }

    async fn upload_csv(&self, path: &Path) -> Result<UploadReceipt> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "feedback.csv".to_string());

        let part = Part::bytes(bytes).file_name(file_name.clone()).mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let url = self.api.endpoint("feedback/upload-csv")?;
        let receipt: UploadReceipt = self
            .api
            .send_json(self.api.http().post(url).multipart(form))
            .await?;
        info!("Uploaded {}: {}", file_name, receipt.message);
        Ok(receipt)
    }
}
