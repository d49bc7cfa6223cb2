pub mod aggregator;
pub mod review;

pub use aggregator::summarize;
pub use review::ReviewService;
