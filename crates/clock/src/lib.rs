//! Time related functions and types.
//!
//! It is usually a good idea to control where "now" comes from in an
//! application so it can be mocked in tests instead of depending on
//! wall-clock sleeps. [`DurationSinceUnixEpoch`] is a `std::time::Duration`
//! since the Unix epoch; [`Time::now`] is the one place that reads the
//! system clock in production.

use std::cell::RefCell;
use std::time::{Duration, SystemTime};

/// A timestamp expressed as a duration since the Unix epoch.
pub type DurationSinceUnixEpoch = Duration;

/// Types that can act as a timestamp source for the tracker.
pub trait Time: Sized {
    fn now() -> DurationSinceUnixEpoch;
}

/// The working clock: it returns the current system time. Used in
/// production.
#[derive(Debug)]
pub struct Working;

impl Time for Working {
    fn now() -> DurationSinceUnixEpoch {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
    }
}

/// The stopped clock: it returns a fixed, thread-local time until it is
/// advanced or reset. Used in tests so freshness checks (`spec.md` I3) don't
/// depend on real elapsed time.
#[derive(Debug)]
pub struct Stopped;

thread_local!(static FIXED_TIME: RefCell<DurationSinceUnixEpoch> = const { RefCell::new(Duration::ZERO) });

impl Time for Stopped {
    fn now() -> DurationSinceUnixEpoch {
        FIXED_TIME.with(|time| *time.borrow())
    }
}

impl Stopped {
    /// Sets the stopped clock to `instant`.
    pub fn set(instant: DurationSinceUnixEpoch) {
        FIXED_TIME.with(|time| *time.borrow_mut() = instant);
    }

    /// Advances the stopped clock by `delta`.
    pub fn advance(delta: Duration) {
        FIXED_TIME.with(|time| {
            let mut time = time.borrow_mut();
            *time = time.saturating_add(delta);
        });
    }

    /// Resets the stopped clock to the Unix epoch.
    pub fn reset() {
        Self::set(Duration::ZERO);
    }
}

/// The clock type used by the rest of the crate: [`Stopped`] in test builds,
/// [`Working`] otherwise.
#[cfg(not(test))]
pub type CurrentClock = Working;
#[cfg(test)]
pub type CurrentClock = Stopped;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{CurrentClock, Stopped, Time, Working};

    #[test]
    fn stopped_clock_defaults_to_the_epoch() {
        assert_eq!(Stopped::now(), Duration::ZERO);
    }

    #[test]
    fn stopped_clock_can_be_set_and_advanced() {
        Stopped::set(Duration::from_secs(100));
        assert_eq!(Stopped::now(), Duration::from_secs(100));

        Stopped::advance(Duration::from_secs(5));
        assert_eq!(Stopped::now(), Duration::from_secs(105));

        Stopped::reset();
        assert_eq!(Stopped::now(), Duration::ZERO);
    }

    #[test]
    fn current_clock_is_stopped_under_test() {
        assert_eq!(CurrentClock::now(), Stopped::now());
        assert_ne!(Working::now(), Stopped::now());
    }
}
