pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod store;

pub use error::ReviewError;
pub use models::*;
pub use services::*;
pub use state::ReviewCellState;
pub use store::{MemoryReviewStore, ReviewStore, SupabaseReviewStore};
