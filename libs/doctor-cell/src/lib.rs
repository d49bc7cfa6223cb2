pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod slot_format;
pub mod state;
pub mod store;

pub use error::DoctorError;
pub use models::*;
pub use services::*;
pub use slot_format::{BookedSlots, DateKey, SlotFormatError, TimeLabel};
pub use state::DoctorCellState;
pub use store::{DoctorStore, MemoryDoctorStore, SupabaseDoctorStore};
