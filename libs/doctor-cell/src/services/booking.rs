use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use shared_utils::clock::Clock;

use crate::error::DoctorError;
use crate::models::{BookSlotRequest, BookingConfirmation, ReservationOutcome, SlotReservation, SlotSelection};
use crate::services::planner::SlotPolicy;
use crate::store::DoctorStore;

/// Turns a booking request into a durable reservation.
///
/// The store's atomic add-if-absent is the only arbiter between concurrent
/// requests for the same slot; nothing here reads availability first.
pub struct BookingCommitter {
    store: Arc<dyn DoctorStore>,
    clock: Arc<dyn Clock>,
    policy: SlotPolicy,
}

impl BookingCommitter {
    pub fn new(store: Arc<dyn DoctorStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(store, clock, SlotPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn DoctorStore>, clock: Arc<dyn Clock>, policy: SlotPolicy) -> Self {
        Self { store, clock, policy }
    }

    #[instrument(skip(self, request))]
    pub async fn commit(&self, patient_id: Uuid, request: BookSlotRequest) -> Result<BookingConfirmation, DoctorError> {
        let selection = SlotSelection::try_from(request)?;
        self.check_offerable(&selection)?;

        let reservation = SlotReservation {
            doctor_id: selection.doctor_id,
            date: selection.date,
            time: selection.time,
            patient_id,
        };

        match self.store.reserve_slot(&reservation).await? {
            ReservationOutcome::Reserved => {
                info!(
                    "Booked {} {} with doctor {}",
                    reservation.date, reservation.time, reservation.doctor_id
                );
                Ok(BookingConfirmation {
                    doctor_id: reservation.doctor_id,
                    patient_id,
                    slot_date: reservation.date,
                    slot_time: reservation.time,
                })
            }
            ReservationOutcome::AlreadyTaken => {
                warn!(
                    "Slot {} {} with doctor {} was already taken",
                    reservation.date, reservation.time, reservation.doctor_id
                );
                Err(DoctorError::SlotUnavailable {
                    date: reservation.date.to_string(),
                    time: reservation.time.to_string(),
                })
            }
        }
    }

    fn check_offerable(&self, selection: &SlotSelection) -> Result<(), DoctorError> {
        if !self.policy.is_on_grid(selection.time.time()) {
            return Err(DoctorError::ValidationError(format!(
                "{} is outside the clinic's booking grid",
                selection.time
            )));
        }
        if selection.starts_at() < self.clock.now() {
            return Err(DoctorError::ValidationError(format!(
                "Slot {} {} has already passed",
                selection.date, selection.time
            )));
        }
        Ok(())
    }
}
