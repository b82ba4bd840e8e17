use chrono::Utc;

/// A source of coarse wall-clock time, read in whole seconds since the Unix
/// epoch.
///
/// The issuance algorithm deliberately works at one-second resolution: the
/// sequence field absorbs all demand inside a single second, so an
/// implementation backed by a finer clock must still truncate to whole
/// seconds. The trait exists so tests can substitute a simulated clock.
///
/// # Example
/// ```
/// use sleet::Clock;
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now_secs(&self) -> i64 {
///         1_700_000_000
///     }
/// }
///
/// assert_eq!(FixedClock.now_secs(), 1_700_000_000);
/// ```
pub trait Clock {
    /// Returns the current time in whole seconds since the Unix epoch.
    fn now_secs(&self) -> i64;
}

/// The production clock: reads the system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        Utc::now().timestamp()
    }
}
