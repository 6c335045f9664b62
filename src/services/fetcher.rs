use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::config::AcademicWindow;
use crate::error::AppError;
use crate::models::CaseReport;
use crate::report::ReportClient;
use crate::services::aggregate::CaseAccumulator;

/// Walks the academic-year window one month at a time, one request per month.
pub struct CaseFetcher {
    client: Arc<dyn ReportClient>,
    window: AcademicWindow,
}

impl CaseFetcher {
    pub fn new(client: Arc<dyn ReportClient>, window: AcademicWindow) -> Self {
        Self { client, window }
    }

    /// Any failing month aborts the whole pass.
    pub async fn fetch_all(&self, today: NaiveDate) -> Result<CaseReport, AppError> {
        let months = self.window.months(today);
        info!(
            "Fetching {} months ({} to {})",
            months.len(),
            self.window.start_date,
            self.window.effective_end(today)
        );

        let mut acc = CaseAccumulator::new();

        for month in months {
            info!("Processing {}", month);
            let report = self.client.fetch_month(month).await?;
            let summary = acc.ingest_month(month, &report)?;
            info!(
                "{}: {} cases ({} students, {} staff)",
                month, summary.totals.cases, summary.totals.students, summary.totals.staff
            );
        }

        let report = acc.finish();
        info!(
            "Fetch completed: {} reported days, {} cases ({} students, {} staff)",
            report.records.len(),
            report.totals.cases,
            report.totals.students,
            report.totals.staff
        );

        Ok(report)
    }
}
