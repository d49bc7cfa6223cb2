use doctor_cell::RatingSummary;

use crate::models::Rating;

/// Recomputes a doctor's summary from the full set of current ratings.
///
/// The mean is rounded half up to one decimal using integer arithmetic:
/// `tenths = (20 * sum + count) / (2 * count)`. An empty set is `0.0` / `0`.
pub fn summarize<I>(ratings: I) -> RatingSummary
where
    I: IntoIterator<Item = Rating>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), rating| (sum + u64::from(rating.value()), count + 1));

    if count == 0 {
        return RatingSummary::default();
    }

    let tenths = (20 * sum + count) / (2 * count);
    RatingSummary::new(tenths as f64 / 10.0, u32::try_from(count).unwrap_or(u32::MAX))
}
