use core::time::Duration;

/// A result type for generator operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants the generator can emit.
///
/// None of these are safe to ignore: each means minting could not proceed
/// without risking a duplicate or out-of-order ID.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The clock reported a time earlier than the last minted timestamp.
    ///
    /// Generator state is left untouched. Callers may retry a bounded number
    /// of times (see [`SkewPolicy`]) but must surface the failure if the
    /// regression persists.
    ///
    /// [`SkewPolicy`]: crate::SkewPolicy
    #[error("clock moved backwards by {behind_ms} ms (last timestamp {last_timestamp}, now {now})")]
    ClockSkew {
        behind_ms: u64,
        last_timestamp: u64,
        now: u64,
    },

    /// The clock reading no longer fits the 41-bit timestamp field.
    #[error("timestamp {now} exceeds the timestamp field (max = {max})")]
    TimestampOverflow { now: u64, max: u64 },

    /// The sequence was exhausted and the clock did not reach the next
    /// millisecond within the generator's wait limit.
    #[error("clock did not reach {yield_until} within {waited:?}")]
    ClockStalled { yield_until: u64, waited: Duration },

    /// Clock skew stayed within tolerance but outlasted the retry budget.
    #[error("clock skew persisted after {attempts} attempts (last regression {last_behind_ms} ms)")]
    SkewRetriesExhausted { attempts: u32, last_behind_ms: u64 },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Magnitude of the clock regression, if this is a skew error.
    pub const fn skew_ms(&self) -> Option<u64> {
        match self {
            Self::ClockSkew { behind_ms, .. } => Some(*behind_ms),
            Self::SkewRetriesExhausted { last_behind_ms, .. } => Some(*last_behind_ms),
            _ => None,
        }
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
