//! # snowmint
//!
//! Snowflake-style distributed ID generation: process-local, coordination-free
//! 64-bit IDs that are unique and time-sortable, given only a statically
//! assigned machine ID.
//!
//! Each [`SnowmintId`] packs, MSB to LSB: 1 reserved bit (always 0), a 41-bit
//! millisecond timestamp relative to a deployment-wide epoch, a 10-bit machine
//! ID, and a 12-bit per-millisecond sequence.
//!
//! ```
//! use snowmint::{DEFAULT_EPOCH, MonotonicClock, SnowmintGenerator, SnowmintId};
//!
//! let clock = MonotonicClock::with_epoch(DEFAULT_EPOCH);
//! let generator = SnowmintGenerator::new(23, clock).unwrap();
//!
//! let id = generator.next_id().unwrap();
//! let parts = SnowmintId::parse(id.to_raw(), DEFAULT_EPOCH);
//! assert_eq!(parts.machine_id, 23);
//! ```

mod error;
mod generator;
mod id;
mod status;
#[cfg(test)]
mod tests;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::status::*;
pub use crate::time::*;
