use std::sync::Arc;

use tracing::info;

use complaint_cell::store::{ComplaintStore, MemoryComplaintStore, SupabaseComplaintStore};
use doctor_cell::store::{DoctorStore, MemoryDoctorStore, SupabaseDoctorStore};
use review_cell::store::{MemoryReviewStore, ReviewStore, SupabaseReviewStore};
use shared_config::{AppConfig, StorageBackend};

/// The persistence backends every cell runs against.
#[derive(Clone)]
pub struct Stores {
    pub doctors: Arc<dyn DoctorStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub complaints: Arc<dyn ComplaintStore>,
}

impl Stores {
    pub fn from_config(config: &AppConfig) -> Self {
        info!("Using {} storage backend", config.storage_backend);
        match config.storage_backend {
            StorageBackend::Memory => Self::in_memory(),
            StorageBackend::Supabase => Self::supabase(config),
        }
    }

    /// Process-local stores. The review store shares the doctor records so
    /// summaries land on the same doctors the directory serves.
    pub fn in_memory() -> Self {
        let doctors = Arc::new(MemoryDoctorStore::new());
        Self {
            reviews: Arc::new(MemoryReviewStore::new(doctors.clone())),
            doctors,
            complaints: Arc::new(MemoryComplaintStore::new()),
        }
    }

    pub fn supabase(config: &AppConfig) -> Self {
        Self {
            doctors: Arc::new(SupabaseDoctorStore::new(config)),
            reviews: Arc::new(SupabaseReviewStore::new(config)),
            complaints: Arc::new(SupabaseComplaintStore::new(config)),
        }
    }
}
