//! Ranking of students by credits received.

use std::cmp::Ordering;

use super::account::StudentName;
use super::ids::AccountId;

/// Number of entries returned when no usable limit is supplied.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
/// Largest number of entries a single request may ask for.
pub const MAX_LEADERBOARD_LIMIT: usize = 100;

/// How many leaderboard entries to return, always within
/// `0..=MAX_LEADERBOARD_LIMIT`. A limit of zero yields an empty board.
///
/// # Examples
/// ```
/// use kudos_backend::domain::LeaderboardLimit;
///
/// assert_eq!(LeaderboardLimit::from_query(None).get(), 10);
/// assert_eq!(LeaderboardLimit::from_query(Some("abc")).get(), 10);
/// assert_eq!(LeaderboardLimit::from_query(Some("500")).get(), 100);
/// assert_eq!(LeaderboardLimit::from_query(Some("0")).get(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardLimit(usize);

impl LeaderboardLimit {
    /// Clamp `requested` into range.
    pub fn new(requested: i64) -> Self {
        let max = MAX_LEADERBOARD_LIMIT as i64;
        Self(requested.clamp(0, max) as usize)
    }

    /// Parse a raw query value, falling back to the default when the value is
    /// missing or not an integer.
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<i64>().ok())
            .map_or_else(Self::default, Self::new)
    }

    /// Number of entries to return.
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for LeaderboardLimit {
    fn default() -> Self {
        Self(DEFAULT_LEADERBOARD_LIMIT)
    }
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub account_id: AccountId,
    pub name: StudentName,
    pub total_received: i64,
    /// Number of transfers the account has received.
    pub recognitions_received: i64,
    /// Endorsements summed over the transfers the account has received.
    pub endorsements_received: i64,
}

/// Leaderboard order: most credits received first, ties by ascending id.
pub fn leaderboard_order(left: &LeaderboardEntry, right: &LeaderboardEntry) -> Ordering {
    right
        .total_received
        .cmp(&left.total_received)
        .then_with(|| left.account_id.cmp(&right.account_id))
}
