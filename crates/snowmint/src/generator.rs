use core::cmp::Ordering;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::{Clock, Error, IdGenStatus, Result, SnowmintId};

/// A lock-based Snowflake-style ID generator, safe to share across threads.
///
/// The mutable state is the last issued [`SnowmintId`] itself, kept behind an
/// [`Arc<Mutex<_>>`]: because timestamp and sequence live packed in one
/// value, no caller can ever observe the pair half-updated, and cloning the
/// generator yields handles onto the same state.
///
/// ## Clock-regression policy
///
/// When the clock reads earlier than the last issued millisecond, the
/// generator does **not** fail and never reuses a timestamp: it reports
/// [`IdGenStatus::Pending`] (and [`Self::next_id`] waits) until the clock
/// catches up. With [`MonotonicClock`] this path is unreachable, but any
/// [`Clock`] implementation is held to it.
///
/// [`MonotonicClock`]: crate::MonotonicClock
pub struct SnowmintGenerator<C>
where
    C: Clock,
{
    state: Arc<Mutex<SnowmintId>>,
    clock: C,
}

impl<C> Clone for SnowmintGenerator<C>
where
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: self.clock.clone(),
        }
    }
}

impl<C> SnowmintGenerator<C>
where
    C: Clock,
{
    /// Creates a new generator for the given machine ID.
    ///
    /// The machine ID must uniquely identify this instance among all
    /// concurrently running generators sharing an epoch; two instances with
    /// the same machine ID can mint colliding IDs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MachineIdOutOfRange`] when `machine_id` does not fit
    /// the 10-bit machine field (`0..=1023`). A misconfigured generator must
    /// not start, so this is checked here rather than masked away.
    pub fn new(machine_id: u64, clock: C) -> Result<Self> {
        if machine_id > SnowmintId::max_machine_id() {
            return Err(Error::MachineIdOutOfRange {
                machine_id,
                max: SnowmintId::max_machine_id(),
            });
        }
        Ok(Self::from_components(0, machine_id, 0, clock))
    }

    /// Creates a generator preloaded with explicit state.
    ///
    /// Useful for tests that need to start at a specific timestamp or with a
    /// nearly exhausted sequence. Component values are masked to their field
    /// widths; prefer [`Self::new`] elsewhere.
    pub fn from_components(timestamp: u64, machine_id: u64, sequence: u64, clock: C) -> Self {
        let id = SnowmintId::from_components(timestamp, machine_id, sequence);
        Self {
            state: Arc::new(Mutex::new(id)),
            clock,
        }
    }

    /// Generates the next ID, waiting out transient stalls.
    ///
    /// Loops over [`Self::try_next_id`], yielding the scheduler between
    /// attempts. The only waits are sequence exhaustion (bounded by the
    /// roughly one millisecond until the clock ticks) and clock regression
    /// (bounded by how far the clock jumped back; see the type-level policy
    /// note).
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if the elapsed time since the
    /// epoch no longer fits the timestamp field.
    pub fn next_id(&self) -> Result<SnowmintId> {
        loop {
            match self.try_next_id()? {
                IdGenStatus::Ready { id } => return Ok(id),
                IdGenStatus::Pending { .. } => thread::yield_now(),
            }
        }
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// # Returns
    ///
    /// - `Ok(IdGenStatus::Ready { id })`: a new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: the time to wait (in
    ///   milliseconds) before trying again
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if the current time since the
    /// epoch exceeds the timestamp field; silently truncating would re-mint
    /// IDs from decades past.
    pub fn try_next_id(&self) -> Result<IdGenStatus> {
        let now = self.clock.current_millis();
        if now > SnowmintId::max_timestamp() {
            return Err(Error::TimestampOverflow {
                timestamp: now,
                bits: SnowmintId::TIMESTAMP_BITS,
            });
        }

        let mut id = self.state.lock();
        let last_ts = id.timestamp();
        match now.cmp(&last_ts) {
            Ordering::Equal => {
                if id.has_sequence_room() {
                    *id = id.increment_sequence();
                    Ok(IdGenStatus::Ready { id: *id })
                } else {
                    Ok(IdGenStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                *id = id.rollover_to_timestamp(now);
                Ok(IdGenStatus::Ready { id: *id })
            }
            Ordering::Less => Ok(Self::cold_clock_behind(now, last_ts)),
        }
    }

    /// Returns the machine ID this generator stamps into every ID.
    pub fn machine_id(&self) -> u64 {
        self.state.lock().machine_id()
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last_ts: u64) -> IdGenStatus {
        IdGenStatus::Pending {
            yield_for: last_ts - now,
        }
    }
}
