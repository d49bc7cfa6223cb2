use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::DoctorError;
use crate::models::{Doctor, RatingSummary, ReservationOutcome, SlotReservation};
use crate::store::DoctorStore;

/// Process-local doctor store. Every write happens under one write lock, so
/// the check and the insert of a reservation cannot interleave.
#[derive(Debug, Default)]
pub struct MemoryDoctorStore {
    doctors: RwLock<HashMap<Uuid, Doctor>>,
}

impl MemoryDoctorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doctors(doctors: impl IntoIterator<Item = Doctor>) -> Self {
        Self {
            doctors: RwLock::new(doctors.into_iter().map(|d| (d.id, d)).collect()),
        }
    }

    pub async fn contains(&self, doctor_id: Uuid) -> bool {
        self.doctors.read().await.contains_key(&doctor_id)
    }

    pub async fn rating_summary(&self, doctor_id: Uuid) -> Option<RatingSummary> {
        self.doctors.read().await.get(&doctor_id).map(|d| d.rating)
    }

    /// Overwrites the denormalized rating figures of one doctor.
    ///
    /// Only the in-process review store calls this, while holding that
    /// doctor's review lock, with a summary recomputed from the full review
    /// set. The `DoctorStore` trait has no rating write, so nothing on the
    /// doctor side can change these figures.
    pub async fn apply_rating_summary(&self, doctor_id: Uuid, summary: RatingSummary) -> Result<(), DoctorError> {
        let mut doctors = self.doctors.write().await;
        let doctor = doctors.get_mut(&doctor_id).ok_or(DoctorError::DoctorNotFound)?;
        doctor.rating = summary;
        debug!(
            "Doctor {} rating is now {} over {} reviews",
            doctor_id, summary.average_rating, summary.total_reviews
        );
        Ok(())
    }
}

#[async_trait]
impl DoctorStore for MemoryDoctorStore {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        let mut doctors: Vec<Doctor> = self.doctors.read().await.values().cloned().collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(doctors)
    }

    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>, DoctorError> {
        Ok(self.doctors.read().await.get(&doctor_id).cloned())
    }

    async fn insert_doctor(&self, doctor: Doctor) -> Result<Doctor, DoctorError> {
        let mut doctors = self.doctors.write().await;
        if doctors.contains_key(&doctor.id) {
            return Err(DoctorError::ValidationError(format!("Doctor {} already exists", doctor.id)));
        }
        doctors.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    async fn reserve_slot(&self, reservation: &SlotReservation) -> Result<ReservationOutcome, DoctorError> {
        let mut doctors = self.doctors.write().await;
        let doctor = doctors
            .get_mut(&reservation.doctor_id)
            .ok_or(DoctorError::DoctorNotFound)?;

        if doctor.booked_slots.insert(&reservation.date, &reservation.time) {
            Ok(ReservationOutcome::Reserved)
        } else {
            Ok(ReservationOutcome::AlreadyTaken)
        }
    }
}
