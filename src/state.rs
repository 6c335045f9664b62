use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::DailyCaseRecord;
use crate::services::CaseService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CaseService>,
    pub records: Arc<RwLock<Vec<DailyCaseRecord>>>,
}

impl AppState {
    pub fn new(service: Arc<CaseService>, records: Vec<DailyCaseRecord>) -> Self {
        Self {
            service,
            records: Arc::new(RwLock::new(records)),
        }
    }
}
