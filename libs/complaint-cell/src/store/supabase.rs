use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::error::ComplaintError;
use crate::models::{Complaint, ComplaintStatus, UpdateComplaintRequest};
use crate::store::ComplaintStore;

pub struct SupabaseComplaintStore {
    supabase: SupabaseClient,
}

#[derive(Debug, Deserialize)]
struct ComplaintRow {
    id: Uuid,
    user_id: Uuid,
    hospital_name: String,
    doctor_name: String,
    department: String,
    complaint_type: String,
    description: String,
    status: ComplaintStatus,
    #[serde(default)]
    admin_response: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ComplaintRow> for Complaint {
    fn from(row: ComplaintRow) -> Self {
        Complaint {
            id: row.id,
            user_id: row.user_id,
            hospital_name: row.hospital_name,
            doctor_name: row.doctor_name,
            department: row.department,
            complaint_type: row.complaint_type,
            description: row.description,
            status: row.status,
            admin_response: row.admin_response.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl SupabaseComplaintStore {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(SupabaseClient::service(config))
    }

    pub fn with_client(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    async fn fetch(&self, path: &str) -> Result<Vec<Complaint>, ComplaintError> {
        let rows: Vec<ComplaintRow> = self.supabase.request(Method::GET, path, None, None).await?;
        Ok(rows.into_iter().map(Complaint::from).collect())
    }
}

#[async_trait]
impl ComplaintStore for SupabaseComplaintStore {
    async fn insert(&self, complaint: Complaint) -> Result<Complaint, ComplaintError> {
        let row = json!({
            "id": complaint.id,
            "user_id": complaint.user_id,
            "hospital_name": complaint.hospital_name,
            "doctor_name": complaint.doctor_name,
            "department": complaint.department,
            "complaint_type": complaint.complaint_type,
            "description": complaint.description,
            "status": complaint.status,
            "admin_response": complaint.admin_response,
            "created_at": complaint.created_at,
            "updated_at": complaint.updated_at,
        });

        let inserted: Vec<ComplaintRow> = self.supabase.insert("complaints", row).await?;
        inserted
            .into_iter()
            .next()
            .map(Complaint::from)
            .ok_or_else(|| ComplaintError::DatabaseError("Insert returned no complaint row".to_string()))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Complaint>, ComplaintError> {
        self.fetch(&format!(
            "/rest/v1/complaints?user_id=eq.{}&select=*&order=created_at.desc",
            user_id
        ))
        .await
    }

    async fn list_all(&self) -> Result<Vec<Complaint>, ComplaintError> {
        self.fetch("/rest/v1/complaints?select=*&order=created_at.desc").await
    }

    async fn update(
        &self,
        complaint_id: Uuid,
        changes: UpdateComplaintRequest,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintError> {
        let mut patch = Map::new();
        if let Some(response) = changes.admin_response {
            patch.insert("admin_response".to_string(), Value::String(response));
        }
        if let Some(status) = changes.status {
            patch.insert("status".to_string(), Value::String(status.to_string()));
        }
        patch.insert("updated_at".to_string(), json!(updated_at));

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let rows: Vec<ComplaintRow> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &format!("/rest/v1/complaints?id=eq.{}", complaint_id),
                None,
                Some(Value::Object(patch)),
                Some(headers),
            )
            .await?;

        Ok(rows.into_iter().next().map(Complaint::from))
    }
}
