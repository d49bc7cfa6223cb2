use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::error::DoctorError;
use crate::models::{Doctor, RatingSummary, ReservationOutcome, SlotReservation};
use crate::slot_format::BookedSlots;
use crate::store::DoctorStore;

/// Doctor store backed by PostgREST.
///
/// A reservation is a row in `doctor_booked_slots`, whose primary key is
/// `(doctor_id, slot_date, slot_time)`. The insert either lands or is
/// rejected by the key, which makes the check-and-add a single statement.
pub struct SupabaseDoctorStore {
    supabase: SupabaseClient,
}

#[derive(Debug, Deserialize)]
struct DoctorRow {
    id: Uuid,
    name: String,
    speciality: String,
    degree: String,
    experience: String,
    #[serde(default)]
    about: Option<String>,
    fees: f64,
    available: bool,
    image: Option<String>,
    average_rating: f64,
    total_reviews: u32,
    created_at: DateTime<Utc>,
}

impl DoctorRow {
    fn into_doctor(self, booked_slots: BookedSlots) -> Doctor {
        Doctor {
            id: self.id,
            name: self.name,
            speciality: self.speciality,
            degree: self.degree,
            experience: self.experience,
            about: self.about.unwrap_or_default(),
            fees: self.fees,
            available: self.available,
            image: self.image,
            rating: RatingSummary::new(self.average_rating, self.total_reviews),
            booked_slots,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BookedSlotRow {
    doctor_id: Uuid,
    slot_date: String,
    slot_time: String,
}

impl SupabaseDoctorStore {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(SupabaseClient::service(config))
    }

    pub fn with_client(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    async fn booked_slots(&self, filter: Option<Uuid>) -> Result<HashMap<Uuid, BookedSlots>, DoctorError> {
        let path = match filter {
            Some(doctor_id) => format!(
                "/rest/v1/doctor_booked_slots?doctor_id=eq.{}&select=doctor_id,slot_date,slot_time",
                doctor_id
            ),
            None => "/rest/v1/doctor_booked_slots?select=doctor_id,slot_date,slot_time".to_string(),
        };

        let rows: Vec<BookedSlotRow> = self.supabase.request(Method::GET, &path, None, None).await?;

        let mut by_doctor: HashMap<Uuid, BookedSlots> = HashMap::new();
        for row in rows {
            by_doctor
                .entry(row.doctor_id)
                .or_default()
                .insert_raw(row.slot_date, row.slot_time);
        }
        Ok(by_doctor)
    }
}

#[async_trait]
impl DoctorStore for SupabaseDoctorStore {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        let rows: Vec<DoctorRow> = self
            .supabase
            .request(Method::GET, "/rest/v1/doctors?select=*&order=name.asc", None, None)
            .await?;
        let mut slots = self.booked_slots(None).await?;

        debug!("Loaded {} doctors", rows.len());

        Ok(rows
            .into_iter()
            .map(|row| {
                let booked = slots.remove(&row.id).unwrap_or_default();
                row.into_doctor(booked)
            })
            .collect())
    }

    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>, DoctorError> {
        let path = format!("/rest/v1/doctors?id=eq.{}&select=*", doctor_id);
        let rows: Vec<DoctorRow> = self.supabase.request(Method::GET, &path, None, None).await?;

        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let booked = self
            .booked_slots(Some(doctor_id))
            .await?
            .remove(&doctor_id)
            .unwrap_or_default();

        Ok(Some(row.into_doctor(booked)))
    }

    async fn insert_doctor(&self, doctor: Doctor) -> Result<Doctor, DoctorError> {
        let row = json!({
            "id": doctor.id,
            "name": doctor.name,
            "speciality": doctor.speciality,
            "degree": doctor.degree,
            "experience": doctor.experience,
            "about": doctor.about,
            "fees": doctor.fees,
            "available": doctor.available,
            "image": doctor.image,
            "average_rating": 0,
            "total_reviews": 0,
            "created_at": doctor.created_at,
        });

        let inserted: Vec<DoctorRow> = self.supabase.insert("doctors", row).await?;
        inserted
            .into_iter()
            .next()
            .map(|row| row.into_doctor(BookedSlots::new()))
            .ok_or_else(|| DoctorError::DatabaseError("Insert returned no doctor row".to_string()))
    }

    async fn reserve_slot(&self, reservation: &SlotReservation) -> Result<ReservationOutcome, DoctorError> {
        let row = json!({
            "doctor_id": reservation.doctor_id,
            "slot_date": reservation.date.to_string(),
            "slot_time": reservation.time.to_string(),
            "patient_id": reservation.patient_id,
        });

        match self.supabase.insert::<BookedSlotRow>("doctor_booked_slots", row).await {
            Ok(_) => Ok(ReservationOutcome::Reserved),
            Err(e) if e.is_unique_violation() => Ok(ReservationOutcome::AlreadyTaken),
            Err(e) if e.is_foreign_key_violation() => Err(DoctorError::DoctorNotFound),
            Err(e) => {
                warn!("Slot reservation for doctor {} failed: {}", reservation.doctor_id, e);
                Err(e.into())
            }
        }
    }
}
