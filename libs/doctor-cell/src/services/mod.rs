pub mod booking;
pub mod doctor;
pub mod planner;

pub use booking::BookingCommitter;
pub use doctor::{DoctorService, DoctorSlots};
pub use planner::{SlotPlanner, SlotPolicy};
