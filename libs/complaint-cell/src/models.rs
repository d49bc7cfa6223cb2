use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ComplaintError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplaintStatus::Pending => write!(f, "Pending"),
            ComplaintStatus::InProgress => write!(f, "In Progress"),
            ComplaintStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hospital_name: String,
    pub doctor_name: String,
    pub department: String,
    pub complaint_type: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub admin_response: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintRequest {
    pub hospital_name: Option<String>,
    pub doctor_name: Option<String>,
    pub department: Option<String>,
    pub complaint_type: Option<String>,
    pub description: Option<String>,
}

impl CreateComplaintRequest {
    /// Builds a new `Pending` complaint owned by `user_id`.
    pub fn into_complaint(self, user_id: Uuid, now: DateTime<Utc>) -> Result<Complaint, ComplaintError> {
        fn required(value: Option<String>, field: &str) -> Result<String, ComplaintError> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ComplaintError::ValidationError(format!("{} is required", field)))
        }

        Ok(Complaint {
            id: Uuid::new_v4(),
            user_id,
            hospital_name: required(self.hospital_name, "hospitalName")?,
            doctor_name: required(self.doctor_name, "doctorName")?,
            department: required(self.department, "department")?,
            complaint_type: required(self.complaint_type, "complaintType")?,
            description: required(self.description, "description")?,
            status: ComplaintStatus::Pending,
            admin_response: String::new(),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintRequest {
    pub admin_response: Option<String>,
    pub status: Option<ComplaintStatus>,
}

impl UpdateComplaintRequest {
    pub fn is_empty(&self) -> bool {
        self.admin_response.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn filled() -> CreateComplaintRequest {
        CreateComplaintRequest {
            hospital_name: Some("City Clinic".to_string()),
            doctor_name: Some("Dr. Richard James".to_string()),
            department: Some("General".to_string()),
            complaint_type: Some("Billing".to_string()),
            description: Some("Charged twice.".to_string()),
        }
    }

    #[test]
    fn new_complaints_start_pending() {
        let complaint = filled().into_complaint(Uuid::new_v4(), Utc::now()).unwrap();
        assert_eq!(complaint.status, ComplaintStatus::Pending);
        assert!(complaint.admin_response.is_empty());
        assert_eq!(complaint.created_at, complaint.updated_at);
    }

    #[test]
    fn every_text_field_is_required() {
        let mut request = filled();
        request.department = Some("  ".to_string());
        assert_matches!(
            request.into_complaint(Uuid::new_v4(), Utc::now()),
            Err(ComplaintError::ValidationError(msg)) if msg == "department is required"
        );

        let mut request = filled();
        request.description = None;
        assert_matches!(
            request.into_complaint(Uuid::new_v4(), Utc::now()),
            Err(ComplaintError::ValidationError(_))
        );
    }

    #[test]
    fn status_uses_display_names_on_the_wire() {
        assert_eq!(serde_json::to_value(ComplaintStatus::InProgress).unwrap(), "In Progress");
        assert_eq!(
            serde_json::from_value::<ComplaintStatus>(serde_json::json!("Resolved")).unwrap(),
            ComplaintStatus::Resolved
        );
        assert!(serde_json::from_value::<ComplaintStatus>(serde_json::json!("Closed")).is_err());
    }
}
