pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ComplaintError;
use crate::models::{Complaint, UpdateComplaintRequest};

pub use memory::MemoryComplaintStore;
pub use supabase::SupabaseComplaintStore;

#[async_trait]
pub trait ComplaintStore: Send + Sync {
    async fn insert(&self, complaint: Complaint) -> Result<Complaint, ComplaintError>;

    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Complaint>, ComplaintError>;

    /// Newest first.
    async fn list_all(&self) -> Result<Vec<Complaint>, ComplaintError>;

    /// Applies the given fields; `None` when no complaint has this id.
    async fn update(
        &self,
        complaint_id: Uuid,
        changes: UpdateComplaintRequest,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintError>;
}
