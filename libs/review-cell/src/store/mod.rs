pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ReviewError;
use crate::models::{Review, ReviewCommit, ReviewMutation};

pub use memory::MemoryReviewStore;
pub use supabase::SupabaseReviewStore;

/// Reviews plus the doctor summary derived from them.
///
/// `commit` is the only write path. It applies the mutation, re-reads the
/// doctor's full review set and writes the new summary as one unit, serialized
/// with every other commit for the same doctor.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Review>, ReviewError>;

    async fn commit(&self, mutation: ReviewMutation) -> Result<ReviewCommit, ReviewError>;
}
