use core::fmt;
use core::time::Duration;

/// A packed 64-bit Snowflake-style identifier.
///
/// ## Bit layout
///
/// The ID is packed from **MSB to LSB**:
///
/// ```text
///  +----------+----------------+--------------+---------------+
///  | reserved | timestamp (41) | machine (10) | sequence (12) |
///  +----------+----------------+--------------+---------------+
///  |<-- MSB ------------- 64 bits ----------------- LSB ----->|
/// ```
///
/// The reserved bit is always zero, so every ID is a non-negative value even
/// when stored in a signed 64-bit column. The timestamp field holds
/// milliseconds since a deployment-wide epoch; for a fixed machine ID, IDs
/// sort by creation time (sub-millisecond order is exact only within one
/// generator's own sequence).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowmintId {
    id: u64,
}

const _: () = {
    // Compile-time check: total bit width _must_ equal the backing type. This
    // is to avoid aliasing surprises.
    assert!(
        SnowmintId::RESERVED_BITS
            + SnowmintId::TIMESTAMP_BITS
            + SnowmintId::MACHINE_BITS
            + SnowmintId::SEQUENCE_BITS
            == u64::BITS,
        "SnowmintId layout must cover the underlying integer exactly"
    );
};

impl SnowmintId {
    pub const RESERVED_BITS: u32 = 1;
    pub const TIMESTAMP_BITS: u32 = 41;
    pub const MACHINE_BITS: u32 = 10;
    pub const SEQUENCE_BITS: u32 = 12;

    pub const SEQUENCE_SHIFT: u32 = 0;
    pub const MACHINE_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
    pub const TIMESTAMP_SHIFT: u32 = Self::MACHINE_SHIFT + Self::MACHINE_BITS;

    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
    pub const MACHINE_MASK: u64 = (1 << Self::MACHINE_BITS) - 1;
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Packs the three components into an ID.
    ///
    /// Each component is masked to its field width; callers that need
    /// overflow detection must check against the `max_*` bounds first (the
    /// generator does).
    pub const fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
        let t = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let m = (machine_id & Self::MACHINE_MASK) << Self::MACHINE_SHIFT;
        let s = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self { id: t | m | s }
    }

    /// Extracts the timestamp field (milliseconds since the epoch).
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the machine ID field.
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_SHIFT) & Self::MACHINE_MASK
    }

    /// Extracts the sequence field.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Maximum representable timestamp value (~69 years of milliseconds).
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Maximum representable machine ID (1023).
    pub const fn max_machine_id() -> u64 {
        Self::MACHINE_MASK
    }

    /// Maximum representable sequence value (4095).
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns true if the sequence field can still be incremented within the
    /// current millisecond.
    pub(crate) const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns the next ID within the same millisecond.
    pub(crate) const fn increment_sequence(&self) -> Self {
        Self { id: self.id + 1 }
    }

    /// Returns the first ID of a newer millisecond (sequence reset to 0).
    pub(crate) const fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.machine_id(), 0)
    }

    /// Converts this ID into its raw `u64` representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw `u64` into an ID.
    ///
    /// No validation beyond the structural layout is performed; the value is
    /// assumed to have been produced by a generator sharing this layout.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Splits a raw ID back into its semantic fields.
    ///
    /// `epoch` must be the same epoch the ID was generated with; the layout
    /// carries no record of it, so a mismatched epoch silently yields a
    /// meaningless wall-clock timestamp.
    pub fn parse(raw: u64, epoch: Duration) -> IdParts {
        let id = Self::from_raw(raw);
        let offset_ms = id.timestamp();
        IdParts {
            timestamp_ms: epoch.as_millis() as u64 + offset_ms,
            offset_ms,
            machine_id: id.machine_id(),
            sequence: id.sequence(),
        }
    }
}

/// The decoded fields of a [`SnowmintId`], recovered by [`SnowmintId::parse`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IdParts {
    /// Absolute wall-clock time of generation, in milliseconds since the Unix
    /// epoch (the timestamp field plus the shared epoch).
    pub timestamp_ms: u64,
    /// The raw timestamp field: milliseconds since the shared epoch.
    pub offset_ms: u64,
    /// The generating instance's machine ID.
    pub machine_id: u64,
    /// The per-millisecond sequence number.
    pub sequence: u64,
}

impl fmt::Display for SnowmintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowmintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowmintId")
            .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
            .field(
                "timestamp",
                &format_args!("{} (0x{:x})", self.timestamp(), self.timestamp()),
            )
            .field(
                "machine_id",
                &format_args!("{} (0x{:x})", self.machine_id(), self.machine_id()),
            )
            .field(
                "sequence",
                &format_args!("{} (0x{:x})", self.sequence(), self.sequence()),
            )
            .finish()
    }
}
