//! Calendar periods that scope the monthly allotment and sending cap.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use mockable::Clock;

/// A calendar month, the unit at which sendable credits reset.
///
/// Two dates fall in the same period when their year and month match; the day
/// is irrelevant.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use kudos_backend::domain::LedgerPeriod;
///
/// let start = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
/// let end = NaiveDate::from_ymd_opt(2026, 3, 31).expect("valid date");
/// assert_eq!(LedgerPeriod::of(start), LedgerPeriod::of(end));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LedgerPeriod {
    year: i32,
    month: u32,
}

impl LedgerPeriod {
    /// Period containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Calendar month, 1-based.
    pub fn month(self) -> u32 {
        self.month
    }
}

impl fmt::Display for LedgerPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Wall-clock reading used by ledger operations.
///
/// Captures the instant once so the reset check and the history record of a
/// single operation agree on the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerNow {
    instant: DateTime<Utc>,
}

impl LedgerNow {
    /// Read the current time from `clock`.
    pub fn read(clock: &dyn Clock) -> Self {
        Self::at(clock.utc())
    }

    /// Wrap a fixed instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// Timestamp stamped onto history records.
    pub fn instant(self) -> DateTime<Utc> {
        self.instant
    }

    /// Calendar date (UTC) used for reset bookkeeping.
    pub fn today(self) -> NaiveDate {
        self.instant.date_naive()
    }

    /// Period containing [`Self::today`].
    pub fn period(self) -> LedgerPeriod {
        LedgerPeriod::of(self.today())
    }
}
