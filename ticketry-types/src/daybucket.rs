//! Calendar day buckets for per-day rate accounting.
//!
//! A bucket is a plain `YYYY-MM-DD` string taken from the host clock's local
//! date. No timezone normalization happens beyond that: two processes in
//! different zones bucket independently, which matches how the loop
//! protection log is scoped to a single host.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar day, formatted `YYYY-MM-DD`.
///
/// Buckets compare and order lexicographically, which for this format is
/// also chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayBucket(String);

impl DayBucket {
    /// Returns the bucket for the host clock's current local date.
    #[must_use]
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Builds a bucket from a specific calendar date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    /// Returns the bucket as its string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DayBucket {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| crate::Error::InvalidDayBucket(format!("{s}: {e}")))?;
        Ok(Self::from_date(date))
    }
}

/// Process-wide clock source for day bucketing.
///
/// Components that purge or count by day take a `Clock` instead of calling
/// [`DayBucket::today`] directly so tests can advance the date.
pub trait Clock: Send + Sync {
    /// Returns the current day bucket.
    fn today(&self) -> DayBucket;
}

/// The host system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DayBucket {
        DayBucket::today()
    }
}
