//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`), which
//! enable the `test-support` feature.

pub mod clock {
    //! Controllable clocks for exercising monthly resets.

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use mockable::Clock;

    /// Clock whose reading can be moved by the test.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        /// Clock reading `now` until moved.
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        /// Clock fixed at midday UTC on the given date.
        pub fn at_date(year: i32, month: u32, day: u32) -> Self {
            let now = match Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single() {
                Some(now) => now,
                None => panic!("invalid clock date {year}-{month}-{day}"),
            };
            Self::new(now)
        }

        /// Jump to an arbitrary instant.
        pub fn set(&self, now: DateTime<Utc>) {
            *self.lock_clock() = now;
        }

        /// Move forward by whole days; negative values move back.
        pub fn advance_days(&self, days: i64) {
            *self.lock_clock() += TimeDelta::days(days);
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}
