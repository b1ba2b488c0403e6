pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `snowmint` can emit.
///
/// Sequence exhaustion and clock regression are deliberately absent: both are
/// transient waits, surfaced as [`IdGenStatus::Pending`] rather than errors.
///
/// [`IdGenStatus::Pending`]: crate::IdGenStatus::Pending
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The configured machine ID does not fit the 10-bit machine field.
    ///
    /// Surfaced at construction time; a generator holding an out-of-range
    /// machine ID must never start, as its IDs could collide with another
    /// instance's.
    #[error("machine ID {machine_id} out of range 0..={max}")]
    MachineIdOutOfRange { machine_id: u64, max: u64 },

    /// The elapsed time since the epoch no longer fits the 41-bit timestamp
    /// field.
    ///
    /// Effectively unreachable within the field's ~69-year capacity, but a
    /// silent wrap would re-mint old IDs, so it fails loudly instead.
    #[error("timestamp {timestamp} overflows the {bits}-bit timestamp field")]
    TimestampOverflow { timestamp: u64, bits: u32 },
}
