use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::ComplaintService;
use crate::store::ComplaintStore;

#[derive(Clone)]
pub struct ComplaintCellState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ComplaintStore>,
}

impl ComplaintCellState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn ComplaintStore>) -> Self {
        Self { config, store }
    }

    pub fn complaint_service(&self) -> ComplaintService {
        ComplaintService::new(self.store.clone())
    }
}
