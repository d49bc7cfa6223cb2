use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DoctorError;
use crate::slot_format::{BookedSlots, DateKey, TimeLabel};

/// Denormalized rating figures kept on the doctor record.
///
/// `average_rating` is always a multiple of 0.1 and is zero exactly when
/// `total_reviews` is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: u32,
}

impl RatingSummary {
    pub fn new(average_rating: f64, total_reviews: u32) -> Self {
        Self { average_rating, total_reviews }
    }

    pub fn is_empty(&self) -> bool {
        self.total_reviews == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub available: bool,
    pub image: Option<String>,
    #[serde(flatten)]
    pub rating: RatingSummary,
    pub booked_slots: BookedSlots,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub name: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub available: Option<bool>,
    pub image: Option<String>,
}

impl CreateDoctorRequest {
    pub fn validate(&self) -> Result<(), DoctorError> {
        let required = [
            ("name", &self.name),
            ("speciality", &self.speciality),
            ("degree", &self.degree),
            ("experience", &self.experience),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(DoctorError::ValidationError(format!("{} is required", field)));
        }
        if !self.fees.is_finite() || self.fees < 0.0 {
            return Err(DoctorError::ValidationError("fees must be a non-negative amount".to_string()));
        }
        Ok(())
    }

    pub fn into_doctor(self, created_at: DateTime<Utc>) -> Doctor {
        Doctor {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            speciality: self.speciality.trim().to_string(),
            degree: self.degree.trim().to_string(),
            experience: self.experience.trim().to_string(),
            about: self.about,
            fees: self.fees,
            available: self.available.unwrap_or(true),
            image: self.image,
            rating: RatingSummary::default(),
            booked_slots: BookedSlots::new(),
            created_at,
        }
    }
}

/// Body of a booking request as it arrives on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSlotRequest {
    pub doc_id: Option<String>,
    pub slot_date: Option<String>,
    pub slot_time: Option<String>,
}

/// A booking request after its identifiers and keys have been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSelection {
    pub doctor_id: Uuid,
    pub date: DateKey,
    pub time: TimeLabel,
}

impl SlotSelection {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.date().and_time(self.time.time())
    }
}

impl TryFrom<BookSlotRequest> for SlotSelection {
    type Error = DoctorError;

    fn try_from(request: BookSlotRequest) -> Result<Self, Self::Error> {
        let (Some(doc_id), Some(slot_date), Some(slot_time)) =
            (request.doc_id, request.slot_date, request.slot_time)
        else {
            return Err(DoctorError::ValidationError("docId, slotDate and slotTime are required".to_string()));
        };

        let doctor_id = Uuid::parse_str(doc_id.trim())
            .map_err(|_| DoctorError::ValidationError("Invalid doctor ID format".to_string()))?;

        Ok(Self {
            doctor_id,
            date: slot_date.parse()?,
            time: slot_time.parse()?,
        })
    }
}

/// A slot write handed to the store. The store must add it only if absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotReservation {
    pub doctor_id: Uuid,
    pub date: DateKey,
    pub time: TimeLabel,
    pub patient_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationOutcome {
    Reserved,
    AlreadyTaken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub slot_date: DateKey,
    pub slot_time: TimeLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCandidate {
    pub datetime: NaiveDateTime,
    pub time: TimeLabel,
}

/// One calendar day of offerable slots. Days with no slots are kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub date_key: DateKey,
    pub slots: Vec<SlotCandidate>,
}

impl DaySchedule {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
