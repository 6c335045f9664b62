pub mod dto;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::{ReportConfig, ReportMonth};
use crate::error::AppError;

pub const REPORT_PATH: &str = "/api/sitdash/dashboard/publicreport";

#[async_trait]
pub trait ReportClient: Send + Sync {
    async fn fetch_month(&self, month: ReportMonth) -> Result<dto::MonthlyReport, AppError>;
}

pub struct ReportHttpClient {
    client: Client,
    config: ReportConfig,
}

impl ReportHttpClient {
    pub fn new(config: ReportConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn month_url(&self, month: ReportMonth) -> String {
        format!(
            "{}{}?rc=&month={:02}&year={}",
            self.config.base_url.trim_end_matches('/'),
            REPORT_PATH,
            month.month,
            month.year
        )
    }

    async fn request_month(&self, month: ReportMonth) -> Result<dto::MonthlyReport, AppError> {
        let url = self.month_url(month);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Status {
                status: response.status(),
                url,
            });
        }

        let body = response.bytes().await?;
        dto::parse_monthly_report(&body)
    }
}

#[async_trait]
impl ReportClient for ReportHttpClient {
    async fn fetch_month(&self, month: ReportMonth) -> Result<dto::MonthlyReport, AppError> {
        let mut attempt = 0;

        loop {
            match self.request_month(month).await {
                Ok(report) => return Ok(report),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(
                        "Fetching {} failed ({}), retry {}/{}",
                        month, e, attempt, self.config.max_retries
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
