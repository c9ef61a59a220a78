use core::time::Duration;

/// Default epoch: Wednesday, January 1, 2025 00:00:00 UTC
///
/// Every timestamp field is measured from this instant. Changing it after IDs
/// have been persisted does not break uniqueness, but [`parse`] on old IDs
/// would report shifted timestamps.
///
/// [`parse`]: crate::SnowflakeId::parse
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// A trait for time sources that return a millisecond timestamp.
///
/// This abstraction allows you to plug in the real wall clock or a mocked
/// time source in tests. The unit is **milliseconds** relative to an origin
/// chosen by the implementation.
///
/// # Example
///
/// ```
/// use snowlink::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
