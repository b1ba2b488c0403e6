use core::time::Duration;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Default epoch: Friday, February 14, 2025 15:13:00 UTC.
///
/// The zero-point of the timestamp field. Every generator and every decoder
/// that must interoperate has to share the same epoch; changing it mid
/// deployment invalidates comparability of previously issued IDs.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_739_526_270_000);

/// A time source that reports milliseconds elapsed since a configured epoch.
///
/// This abstraction lets tests inject fixed or stepped clocks; production
/// code uses [`MonotonicClock`].
pub trait Clock {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

/// A monotonic time source anchored to a user-defined epoch.
///
/// The wall clock is read exactly once, at construction, to compute the
/// offset between the epoch and process start; from then on every reading is
/// that offset plus the elapsed monotonic time ([`Instant`]). External clock
/// adjustments (NTP, manual changes) therefore never move this clock
/// backward.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    start: Instant,
    epoch_offset: u64, // in milliseconds
}

impl Default for MonotonicClock {
    /// Constructs a monotonic clock aligned to [`DEFAULT_EPOCH`].
    ///
    /// Panics if system time is earlier than the default epoch.
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock using a custom epoch as the origin
    /// (t = 0), specified as a [`Duration`] since 1970-01-01 UTC.
    ///
    /// # Panics
    ///
    /// Panics if the current system time is earlier than the given epoch.
    pub fn with_epoch(epoch: Duration) -> Self {
        let start = Instant::now();
        let system_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System clock before UNIX_EPOCH");
        let epoch_offset = system_now
            .checked_sub(epoch)
            .expect("System clock before custom epoch")
            .as_millis() as u64;
        Self {
            start,
            epoch_offset,
        }
    }
}

impl Clock for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.start.elapsed().as_millis() as u64
    }
}
