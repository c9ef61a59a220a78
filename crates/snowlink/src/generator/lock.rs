use core::{cmp::Ordering, time::Duration};
use std::{sync::Arc, time::Instant};

use crossbeam_utils::Backoff;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    NodeId, SnowflakeId,
    generator::{Error, IdGenStatus, Mutex, Result},
    time::TimeSource,
};

/// Default upper bound on how long [`SnowflakeGenerator::next_id`] waits for
/// the clock to tick after the sequence is exhausted.
///
/// With a healthy clock the wait is under one millisecond. Hitting this limit
/// means the time source has stopped advancing.
pub const DEFAULT_WAIT_LIMIT: Duration = Duration::from_secs(1);

/// Sleep between clock polls once spinning and yielding have backed off.
const POLL_INTERVAL: Duration = Duration::from_micros(100);

/// Last minted ID plus whether anything has been minted yet. The packed ID
/// carries `last_timestamp`, `node_id` and `sequence`.
#[derive(Clone, Copy, Debug)]
struct State {
    last: SnowflakeId,
    minted: bool,
}

/// A lock-based Snowflake ID generator for multi-threaded use.
///
/// All state sits behind one mutex, so the read-clock, compare, increment and
/// store steps of minting happen atomically: concurrent callers never observe
/// or reuse the same `(timestamp, sequence)` pair. The clock is read while
/// holding the lock. Reading it before would let a caller that lost the race
/// see its own stale reading as a regression.
///
/// Cloning is cheap and yields a handle to the same state, so one generator
/// per process can be handed to every caller.
///
/// # Example
///
/// ```
/// use snowlink::{NodeId, SnowflakeGenerator, WallClock};
///
/// let generator = SnowflakeGenerator::new(NodeId::new(1).unwrap(), WallClock::default());
/// let a = generator.next_id().unwrap();
/// let b = generator.next_id().unwrap();
/// assert!(a < b);
/// assert_eq!(a.node_id(), 1);
/// ```
pub struct SnowflakeGenerator<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<State>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<State>>,
    node_id: NodeId,
    time: T,
    wait_limit: Duration,
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `node_id` reading time from `time`.
    ///
    /// The first call to [`Self::next_id`] mints sequence `0` at whatever the
    /// clock reads at that moment.
    pub fn new(node_id: NodeId, time: T) -> Self {
        Self::with_state(
            State {
                last: SnowflakeId::from_components(0, node_id.get(), 0),
                minted: false,
            },
            node_id,
            time,
        )
    }

    /// Creates a generator that resumes from a previously minted ID.
    ///
    /// Useful for restoring state from persistent storage: the next ID will
    /// be strictly greater than `timestamp`/`sequence`, and a clock reading
    /// earlier than `timestamp` is reported as skew.
    pub fn from_components(timestamp: u64, node_id: NodeId, sequence: u64, time: T) -> Self {
        Self::with_state(
            State {
                last: SnowflakeId::from_components(timestamp, node_id.get(), sequence),
                minted: true,
            },
            node_id,
            time,
        )
    }

    fn with_state(state: State, node_id: NodeId, time: T) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(state))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(state)),
            node_id,
            time,
            wait_limit: DEFAULT_WAIT_LIMIT,
        }
    }

    /// Overrides how long [`Self::next_id`] may wait for a clock tick.
    #[must_use]
    pub fn with_wait_limit(mut self, wait_limit: Duration) -> Self {
        self.wait_limit = wait_limit;
        self
    }

    pub const fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// The most recently minted ID, or `None` if nothing has been minted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the lock is poisoned.
    pub fn last_id(&self) -> Result<Option<SnowflakeId>> {
        let state = self.snapshot()?;
        Ok(state.minted.then_some(state.last))
    }

    fn snapshot(&self) -> Result<State> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(*self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(*self.state.lock()?)
        }
    }

    /// Mints the next ID, waiting out sequence exhaustion.
    ///
    /// Blocks only when 4096 IDs were already minted in the current
    /// millisecond, and never while holding the lock. The wait spins, then
    /// yields, then sleeps in 100 µs steps until the clock ticks.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockSkew`] if the clock moved backwards, including while
    ///   waiting for the next tick. Returned at once.
    /// - [`Error::TimestampOverflow`] if the clock is past the 41-bit range.
    /// - [`Error::ClockStalled`] if the clock did not tick within the wait
    ///   limit.
    /// - [`Error::LockPoisoned`] if the lock is poisoned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<SnowflakeId> {
        let mut started: Option<Instant> = None;
        loop {
            match self.poll_id()? {
                IdGenStatus::Ready { id } => return Ok(id),
                IdGenStatus::Pending { yield_until } => {
                    let started = *started.get_or_insert_with(Instant::now);
                    self.wait_for_tick(yield_until, started)?;
                }
            }
        }
    }

    /// Performs one minting step without waiting.
    ///
    /// Returns [`IdGenStatus::Ready`] with a new ID, or
    /// [`IdGenStatus::Pending`] if the sequence is exhausted for the current
    /// millisecond. `Pending` and every error leave the state untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_id`], minus [`Error::ClockStalled`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Result<IdGenStatus> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        let now = self.time.current_millis();
        let last_ts = state.last.timestamp();

        match now.cmp(&last_ts) {
            Ordering::Less => Err(Self::cold_clock_behind(now, last_ts)),
            Ordering::Equal if state.minted => {
                if state.last.has_sequence_room() {
                    state.last = state.last.increment_sequence();
                    Ok(IdGenStatus::Ready { id: state.last })
                } else {
                    Ok(IdGenStatus::Pending {
                        yield_until: last_ts + 1,
                    })
                }
            }
            _ => {
                if now > SnowflakeId::max_timestamp() {
                    return Err(Error::TimestampOverflow {
                        now,
                        max: SnowflakeId::max_timestamp(),
                    });
                }
                state.last = state.last.rollover_to_timestamp(now);
                state.minted = true;
                Ok(IdGenStatus::Ready { id: state.last })
            }
        }
    }

    fn wait_for_tick(&self, yield_until: u64, started: Instant) -> Result<()> {
        let last_timestamp = yield_until - 1;
        let backoff = Backoff::new();
        loop {
            let now = self.time.current_millis();
            if now >= yield_until {
                return Ok(());
            }
            if now < last_timestamp {
                return Err(Self::cold_clock_behind(now, last_timestamp));
            }
            let waited = started.elapsed();
            if waited >= self.wait_limit {
                return Err(Error::ClockStalled {
                    yield_until,
                    waited,
                });
            }
            if backoff.is_completed() {
                std::thread::sleep(POLL_INTERVAL);
            } else {
                backoff.snooze();
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last_timestamp: u64) -> Error {
        let behind_ms = last_timestamp - now;
        #[cfg(feature = "tracing")]
        tracing::warn!(behind_ms, last_timestamp, now, "clock moved backwards");
        Error::ClockSkew {
            behind_ms,
            last_timestamp,
            now,
        }
    }
}

impl<T> Clone for SnowflakeGenerator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            node_id: self.node_id,
            time: self.time.clone(),
            wait_limit: self.wait_limit,
        }
    }
}

impl<T> core::fmt::Debug for SnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("node_id", &self.node_id)
            .field("state", &self.snapshot().ok())
            .field("wait_limit", &self.wait_limit)
            .finish_non_exhaustive()
    }
}
