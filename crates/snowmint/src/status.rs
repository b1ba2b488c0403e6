use crate::SnowmintId;

/// The outcome of a single non-blocking generation attempt.
///
/// [`SnowmintGenerator::try_next_id`] never waits: when the sequence space
/// for the current millisecond is exhausted, or the clock reads earlier than
/// the last issued millisecond, it reports how long the caller should yield
/// before retrying instead of blocking inside the critical section.
///
/// # Example
///
/// ```
/// use snowmint::{Clock, IdGenStatus, SnowmintGenerator};
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let generator = SnowmintGenerator::new(0, FixedClock).unwrap();
/// match generator.try_next_id().unwrap() {
///     IdGenStatus::Ready { id } => println!("ID: {id}"),
///     IdGenStatus::Pending { yield_for } => println!("retry in {yield_for}ms"),
/// }
/// ```
///
/// [`SnowmintGenerator::try_next_id`]: crate::SnowmintGenerator::try_next_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowmintId,
    },
    /// No ID could be generated on this attempt.
    Pending {
        /// Milliseconds the clock must advance before a retry can succeed.
        yield_for: u64,
    },
}
