use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::ReviewService;
use crate::store::ReviewStore;

#[derive(Clone)]
pub struct ReviewCellState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ReviewStore>,
}

impl ReviewCellState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn ReviewStore>) -> Self {
        Self { config, store }
    }

    pub fn review_service(&self) -> ReviewService {
        ReviewService::new(self.store.clone())
    }
}
