pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod store;

pub use error::ComplaintError;
pub use models::*;
pub use services::ComplaintService;
pub use state::ComplaintCellState;
pub use store::{ComplaintStore, MemoryComplaintStore, SupabaseComplaintStore};
