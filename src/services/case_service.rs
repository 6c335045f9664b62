use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::config::AcademicWindow;
use crate::error::AppError;
use crate::models::{CaseReport, DailyCaseRecord};
use crate::report::ReportClient;
use crate::services::{cache, fetcher::CaseFetcher};

pub struct CaseService {
    fetcher: CaseFetcher,
    cache_path: Option<PathBuf>,
}

impl CaseService {
    pub fn new(
        client: Arc<dyn ReportClient>,
        window: AcademicWindow,
        cache_path: Option<PathBuf>,
    ) -> Self {
        Self {
            fetcher: CaseFetcher::new(client, window),
            cache_path,
        }
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// A cache file, when present, is used as-is and the endpoint is not contacted.
    pub async fn load(&self, today: NaiveDate) -> Result<Vec<DailyCaseRecord>, AppError> {
        if let Some(path) = self.cache_path() {
            if let Some(records) = cache::load_cache(path)? {
                return Ok(records);
            }
            info!("No cache at {}, fetching live", path.display());
        }

        Ok(self.refresh(today).await?.records)
    }

    /// Always goes to the reporting endpoint.
    pub async fn refresh(&self, today: NaiveDate) -> Result<CaseReport, AppError> {
        self.fetcher.fetch_all(today).await
    }
}
