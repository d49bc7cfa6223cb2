use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use shared_utils::clock::Clock;

use crate::error::DoctorError;
use crate::models::{CreateDoctorRequest, DaySchedule, Doctor};
use crate::services::planner::SlotPlanner;
use crate::store::DoctorStore;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSlots {
    pub doctor_id: Uuid,
    pub days: Vec<DaySchedule>,
}

/// Doctor directory reads and admin writes.
pub struct DoctorService {
    store: Arc<dyn DoctorStore>,
    clock: Arc<dyn Clock>,
    planner: SlotPlanner,
}

impl DoctorService {
    pub fn new(store: Arc<dyn DoctorStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            planner: SlotPlanner::default(),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        self.store.list_doctors().await
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        self.store
            .get_doctor(doctor_id)
            .await?
            .ok_or(DoctorError::DoctorNotFound)
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        request.validate()?;
        let doctor = self.store.insert_doctor(request.into_doctor(Utc::now())).await?;
        info!("Added doctor {} ({})", doctor.name, doctor.id);
        Ok(doctor)
    }

    /// Offerable slots for the coming week, computed from the stored bookings.
    pub async fn available_slots(&self, doctor_id: Uuid) -> Result<DoctorSlots, DoctorError> {
        let doctor = self.get_doctor(doctor_id).await?;
        let now = self.clock.now();

        let days = self.planner.plan(now, &doctor.booked_slots);
        debug!(
            "Planned {} open slots for doctor {} from {}",
            days.iter().map(|d| d.slots.len()).sum::<usize>(),
            doctor_id,
            now
        );

        Ok(DoctorSlots { doctor_id, days })
    }
}
