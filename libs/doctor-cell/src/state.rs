use std::sync::Arc;

use shared_config::AppConfig;
use shared_utils::clock::Clock;

use crate::services::{BookingCommitter, DoctorService};
use crate::store::DoctorStore;

#[derive(Clone)]
pub struct DoctorCellState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DoctorStore>,
    pub clock: Arc<dyn Clock>,
}

impl DoctorCellState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn DoctorStore>, clock: Arc<dyn Clock>) -> Self {
        Self { config, store, clock }
    }

    pub fn doctor_service(&self) -> DoctorService {
        DoctorService::new(self.store.clone(), self.clock.clone())
    }

    pub fn booking_committer(&self) -> BookingCommitter {
        BookingCommitter::new(self.store.clone(), self.clock.clone())
    }
}
