use crate::{DEFAULT_EPOCH, TimeSource};
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// A wall-clock time source offset from a fixed epoch.
///
/// Every call reads `SystemTime::now()`. Wall time follows NTP corrections
/// and manual adjustments, so it can move backward; the generator detects
/// that and refuses to mint rather than reuse a timestamp.
///
/// A system time earlier than the epoch reads as `0`.
///
/// # Example
///
/// ```
/// use snowlink::{TimeSource, WallClock};
///
/// let clock = WallClock::default();
/// let a = clock.current_millis();
/// let b = clock.current_millis();
/// assert!(a > 0);
/// assert!(b + 1000 > a);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallClock {
    epoch_millis: u64,
}

impl Default for WallClock {
    /// Constructs a wall clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl WallClock {
    /// Constructs a wall clock using `epoch` (a [`Duration`] since
    /// 1970-01-01 UTC) as t = 0.
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: epoch.as_millis() as u64,
        }
    }

    /// The epoch as milliseconds since the Unix epoch.
    pub const fn epoch_millis(&self) -> u64 {
        self.epoch_millis
    }

    /// Converts an epoch-relative timestamp (as stored in an ID) back to
    /// milliseconds since the Unix epoch.
    pub const fn unix_millis(&self, timestamp: u64) -> u64 {
        self.epoch_millis.saturating_add(timestamp)
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        let unix_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        unix_millis.saturating_sub(self.epoch_millis)
    }
}
