use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ComplaintError;
use crate::models::{Complaint, UpdateComplaintRequest};
use crate::store::ComplaintStore;

#[derive(Debug, Default)]
pub struct MemoryComplaintStore {
    complaints: RwLock<HashMap<Uuid, Complaint>>,
}

impl MemoryComplaintStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn newest_first(&self, keep: impl Fn(&Complaint) -> bool) -> Vec<Complaint> {
        let mut complaints: Vec<Complaint> = self
            .complaints
            .read()
            .await
            .values()
            .filter(|c| keep(c))
            .cloned()
            .collect();
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        complaints
    }
}

#[async_trait]
impl ComplaintStore for MemoryComplaintStore {
    async fn insert(&self, complaint: Complaint) -> Result<Complaint, ComplaintError> {
        self.complaints.write().await.insert(complaint.id, complaint.clone());
        Ok(complaint)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Complaint>, ComplaintError> {
        Ok(self.newest_first(|c| c.user_id == user_id).await)
    }

    async fn list_all(&self) -> Result<Vec<Complaint>, ComplaintError> {
        Ok(self.newest_first(|_| true).await)
    }

    async fn update(
        &self,
        complaint_id: Uuid,
        changes: UpdateComplaintRequest,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintError> {
        let mut complaints = self.complaints.write().await;
        let Some(complaint) = complaints.get_mut(&complaint_id) else {
            return Ok(None);
        };

        if let Some(response) = changes.admin_response {
            complaint.admin_response = response;
        }
        if let Some(status) = changes.status {
            complaint.status = status;
        }
        complaint.updated_at = updated_at;

        Ok(Some(complaint.clone()))
    }
}
