use crate::SnowflakeId;

/// The outcome of a single [`SnowflakeGenerator::poll_id`] step.
///
/// - [`IdGenStatus::Ready`]: a new ID was minted.
/// - [`IdGenStatus::Pending`]: all 4096 sequence values of the current
///   millisecond are used up. Nothing was minted and the state is unchanged;
///   poll again once the clock reaches `yield_until`.
///
/// [`SnowflakeGenerator::next_id`] hides `Pending` behind a bounded wait. Use
/// `poll_id` directly to drive your own backoff.
///
/// [`SnowflakeGenerator::poll_id`]: crate::SnowflakeGenerator::poll_id
/// [`SnowflakeGenerator::next_id`]: crate::SnowflakeGenerator::next_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// The sequence is exhausted for the current millisecond.
    Pending {
        /// The next timestamp (inclusive) at which minting can resume.
        yield_until: u64,
    },
}
