use core::{fmt, num::ParseIntError, str::FromStr};

/// A 64-bit Snowflake ID.
///
/// - 1 bit reserved (always zero)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 10 bits node ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21          12 11             0
///              +--------------+----------------+--------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | node ID (10) | sequence (12) |
///              +--------------+----------------+--------------+---------------+
///              |<----------- MSB ---------- 64 bits ---------- LSB ---------->|
/// ```
///
/// Raw values order the same way as `(timestamp, node_id, sequence)` tuples,
/// so sorting IDs sorts them by mint time.
///
/// # Example
///
/// ```
/// use snowlink::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.node_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(id.to_raw(), (1000 << 22) | (2 << 12) | 1);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for the reserved top bit.
    pub const RESERVED_MASK: u64 = 1 << 63;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for extracting the 10-bit node ID field. Occupies bits 12
    /// through 21.
    pub const NODE_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the node ID to its correct position (bit 12).
    pub const NODE_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the three fields into an ID. Out-of-range values are masked to
    /// their field width.
    pub const fn from_components(timestamp: u64, node_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let node_id = (node_id & Self::NODE_ID_MASK) << Self::NODE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | node_id | sequence,
        }
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the node ID from the packed ID.
    pub const fn node_id(&self) -> u64 {
        (self.id >> Self::NODE_ID_SHIFT) & Self::NODE_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    pub const fn max_node_id() -> u64 {
        Self::NODE_ID_MASK
    }

    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns `true` if the reserved bit is clear.
    ///
    /// Every ID minted by a generator is valid. Values recovered from
    /// untrusted input (e.g. a decoded token) may not be.
    pub const fn is_valid(&self) -> bool {
        self.id & Self::RESERVED_MASK == 0
    }

    /// Splits the ID into its fields.
    pub const fn parse(&self) -> Components {
        Components {
            timestamp: self.timestamp(),
            node_id: self.node_id(),
            sequence: self.sequence(),
        }
    }

    /// Returns true if the sequence can be incremented within the current
    /// millisecond.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns a new ID with the sequence incremented.
    pub const fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.node_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a newer timestamp with the sequence reset to zero.
    pub const fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_components(ts, self.node_id(), 0)
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

/// The fields of a [`SnowflakeId`], as returned by [`SnowflakeId::parse`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Components {
    pub timestamp: u64,
    pub node_id: u64,
    pub sequence: u64,
}

impl Components {
    pub const fn to_id(&self) -> SnowflakeId {
        SnowflakeId::from_components(self.timestamp, self.node_id, self.sequence)
    }
}

impl From<SnowflakeId> for Components {
    fn from(id: SnowflakeId) -> Self {
        id.parse()
    }
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl FromStr for SnowflakeId {
    type Err = ParseIntError;

    /// Parses the decimal form produced by [`fmt::Display`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self::from_raw)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
