/// Errors returned when decoding a Base62 token.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Base62Error {
    /// A character outside the alphabet. `index` counts characters, not
    /// bytes.
    #[error("invalid base62 character {ch:?} at position {index}")]
    InvalidCharacter { ch: char, index: usize },

    /// The input was empty. `"0"` is the encoding of zero.
    #[error("empty base62 input")]
    Empty,

    /// The decoded value does not fit the target integer type.
    #[error("base62 input of length {len} overflows the target integer")]
    Overflow { len: usize },

    /// The decoded value sets the reserved bit of a [`SnowflakeId`].
    ///
    /// [`SnowflakeId`]: crate::SnowflakeId
    #[error("decoded value {raw} is not a valid snowflake id")]
    InvalidId { raw: u64 },
}
