pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DoctorError;
use crate::models::{Doctor, ReservationOutcome, SlotReservation};

pub use memory::MemoryDoctorStore;
pub use supabase::SupabaseDoctorStore;

/// Durable home of doctor records and their booked slots.
#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError>;

    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>, DoctorError>;

    async fn insert_doctor(&self, doctor: Doctor) -> Result<Doctor, DoctorError>;

    /// Adds the slot only if no one holds it yet, as a single atomic step.
    ///
    /// Fails with `DoctorNotFound` when the doctor does not exist.
    async fn reserve_slot(&self, reservation: &SlotReservation) -> Result<ReservationOutcome, DoctorError>;
}
