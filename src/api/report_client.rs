use async_trait::async_trait;
use tracing::info;

use super::{ApiClient, ReportGateway, Result};
use crate::models::{Config, EmailRequest, Report};

/// HTTP client for the `/report` routes
#[derive(Debug, Clone)]
pub struct ReportClient {
    api: ApiClient,
}

impl ReportClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_api(ApiClient::new(config)?))
    }

    pub fn with_api(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ReportGateway for ReportClient {
    async fn latest_report(&self) -> Result<Option<Report>> {
        let url = self.api.endpoint("report/latest")?;
        match self.api.send_json::<Report>(self.api.http().get(url)).await {
            Ok(report) => Ok(Some(report)),
            Err(e) if e.is_not_found() => {
                info!("No report generated yet");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_reports(&self) -> Result<Vec<Report>> {
        let url = self.api.endpoint("report/all")?;
        self.api.send_json(self.api.http().get(url)).await
    }

    async fn generate_report(&self) -> Result<Report> {
        let url = self.api.endpoint("report/generate")?;
        let report: Report = self.api.send_json(self.api.http().post(url)).await?;
        info!("Generated report {}", report.id);
        Ok(report)
    }

    async fn send_report_email(&self, email: &str) -> Result<()> {
        let url = self.api.endpoint("report/send-to-email")?;
        let body = EmailRequest {
            email: email.to_string(),
        };
        self.api.send(self.api.http().post(url).json(&body)).await?;
        info!("Report emailed to {}", email);
        Ok(())
    }
}
