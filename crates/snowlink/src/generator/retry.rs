use core::time::Duration;

use crate::{
    SnowflakeId,
    generator::{Error, Result, SnowflakeGenerator},
    time::TimeSource,
};

/// Bounded retry policy for clock skew.
///
/// Small regressions (an NTP slew, a VM migration hiccup) usually heal within
/// a few milliseconds, so they are retried after a short pause. A regression
/// larger than `max_tolerated_skew` fails at once: waiting it out would stall
/// callers for as long as the clock is behind.
///
/// Every retry re-runs the full skew check. An ID is only ever minted from a
/// timestamp that is at or past the last one.
///
/// # Example
///
/// ```
/// use snowlink::{NodeId, SkewPolicy, SnowflakeGenerator, WallClock};
///
/// let generator = SnowflakeGenerator::new(NodeId::new(3).unwrap(), WallClock::default());
/// let id = SkewPolicy::default().next_id(&generator).unwrap();
/// assert_eq!(id.node_id(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkewPolicy {
    /// Retries after the first attempt. `0` disables retrying.
    pub max_retries: u32,
    /// Largest regression that is retried at all.
    pub max_tolerated_skew: Duration,
    /// Minimum pause between attempts. The pause is stretched to the observed
    /// regression when that is longer.
    pub retry_delay: Duration,
}

impl Default for SkewPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_tolerated_skew: Duration::from_millis(5),
            retry_delay: Duration::from_millis(1),
        }
    }
}

impl SkewPolicy {
    /// A policy that surfaces every skew error immediately.
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            max_tolerated_skew: Duration::ZERO,
            retry_delay: Duration::ZERO,
        }
    }

    /// Mints an ID via [`SnowflakeGenerator::next_id`], retrying tolerated
    /// clock skew.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockSkew`] if the regression exceeds `max_tolerated_skew`.
    /// - [`Error::SkewRetriesExhausted`] if skew within tolerance outlasts
    ///   `max_retries`.
    /// - Any other generator error, unchanged.
    pub fn next_id<T>(&self, generator: &SnowflakeGenerator<T>) -> Result<SnowflakeId>
    where
        T: TimeSource,
    {
        let tolerated = u64::try_from(self.max_tolerated_skew.as_millis()).unwrap_or(u64::MAX);
        let mut retries = 0;
        loop {
            match generator.next_id() {
                Err(Error::ClockSkew { behind_ms, .. }) if behind_ms <= tolerated => {
                    if retries >= self.max_retries {
                        #[cfg(feature = "tracing")]
                        tracing::error!(attempts = retries + 1, behind_ms, "clock skew persisted");
                        return Err(Error::SkewRetriesExhausted {
                            attempts: retries + 1,
                            last_behind_ms: behind_ms,
                        });
                    }
                    retries += 1;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(retry = retries, behind_ms, "retrying after clock skew");
                    std::thread::sleep(self.retry_delay.max(Duration::from_millis(behind_ms)));
                }
                result => return result,
            }
        }
    }
}
