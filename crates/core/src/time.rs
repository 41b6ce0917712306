use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// A clock abstraction for deterministic time in sessions and tests.
#[derive(Debug, Clone, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
    /// Shared, manually advanced time. Clones observe the same instant.
    Manual(ManualClock),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
            Clock::Manual(manual) => manual.now(),
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Manual clocks advance through any of their handles; the system clock
    /// is unaffected.
    pub fn advance(&mut self, delta: Duration) {
        match self {
            Clock::System => {}
            Clock::Fixed(t) => *t += delta,
            Clock::Manual(manual) => manual.advance(delta),
        }
    }
}

/// Handle to a manually driven instant shared between clones.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(at)),
        }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn advance(&self, delta: Duration) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += delta;
    }

    /// A [`Clock`] reading from this handle.
    #[must_use]
    pub fn clock(&self) -> Clock {
        Clock::Manual(self.clone())
    }
}

/// Rounds a duration to whole seconds, half away from zero.
#[must_use]
pub fn round_secs(d: Duration) -> i64 {
    let ms = d.num_milliseconds();
    if ms >= 0 {
        (ms + 500) / 1000
    } else {
        (ms - 500) / 1000
    }
}

/// Formats a duration as `HH : MM : SS`. Negative durations render as zero.
#[must_use]
pub fn format_hms(d: Duration) -> String {
    let total = round_secs(d).max(0);
    format!(
        "{:02} : {:02} : {:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Countdown rendering: like [`format_hms`], but an expired timer shows dashes.
#[must_use]
pub fn format_countdown(remaining: Duration) -> String {
    if round_secs(remaining) <= 0 {
        "-- : -- : --".to_string()
    } else {
        format_hms(remaining)
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances_in_place() {
        let mut clock = fixed_clock();
        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), fixed_now() + Duration::seconds(90));
    }

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let manual = ManualClock::new(fixed_now());
        let clock = manual.clock();
        manual.advance(Duration::minutes(2));
        assert_eq!(clock.now(), fixed_now() + Duration::minutes(2));
    }

    #[test]
    fn hms_formatting() {
        assert_eq!(format_hms(Duration::seconds(0)), "00 : 00 : 00");
        assert_eq!(format_hms(Duration::seconds(3725)), "01 : 02 : 05");
        assert_eq!(format_hms(Duration::milliseconds(59_600)), "00 : 01 : 00");
        assert_eq!(format_hms(Duration::seconds(-4)), "00 : 00 : 00");
    }

    #[test]
    fn countdown_shows_dashes_when_expired() {
        assert_eq!(format_countdown(Duration::zero()), "-- : -- : --");
        assert_eq!(format_countdown(Duration::milliseconds(400)), "-- : -- : --");
        assert_eq!(format_countdown(Duration::seconds(61)), "00 : 01 : 01");
    }
}
