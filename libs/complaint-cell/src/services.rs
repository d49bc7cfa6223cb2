use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::auth::User;

use crate::error::ComplaintError;
use crate::models::{Complaint, CreateComplaintRequest, UpdateComplaintRequest};
use crate::store::ComplaintStore;

pub struct ComplaintService {
    store: Arc<dyn ComplaintStore>,
}

fn user_uuid(user: &User) -> Result<Uuid, ComplaintError> {
    user.uuid()
        .ok_or_else(|| ComplaintError::ValidationError("Invalid user ID format".to_string()))
}

impl ComplaintService {
    pub fn new(store: Arc<dyn ComplaintStore>) -> Self {
        Self { store }
    }

    pub async fn file_complaint(&self, user: &User, request: CreateComplaintRequest) -> Result<Complaint, ComplaintError> {
        let complaint = request.into_complaint(user_uuid(user)?, Utc::now())?;
        let complaint = self.store.insert(complaint).await?;
        info!("Complaint {} filed by user {}", complaint.id, complaint.user_id);
        Ok(complaint)
    }

    pub async fn complaints_for(&self, user: &User) -> Result<Vec<Complaint>, ComplaintError> {
        let complaints = self.store.list_for_user(user_uuid(user)?).await?;
        debug!("User {} has {} complaints", user.id, complaints.len());
        Ok(complaints)
    }

    pub async fn all_complaints(&self) -> Result<Vec<Complaint>, ComplaintError> {
        self.store.list_all().await
    }

    pub async fn respond(&self, complaint_id: &str, changes: UpdateComplaintRequest) -> Result<Complaint, ComplaintError> {
        let complaint_id = Uuid::parse_str(complaint_id)
            .map_err(|_| ComplaintError::ValidationError("Invalid complaint ID format".to_string()))?;
        if changes.is_empty() {
            return Err(ComplaintError::ValidationError("Nothing to update".to_string()));
        }

        let complaint = self
            .store
            .update(complaint_id, changes, Utc::now())
            .await?
            .ok_or(ComplaintError::NotFound)?;
        info!("Complaint {} is now {}", complaint.id, complaint.status);
        Ok(complaint)
    }
}
