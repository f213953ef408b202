//! Pay period model.
//!
//! This module contains the [`PayrollPeriod`] type: a calendar month that a
//! payroll run covers, from its first to its last calendar day.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A payroll period with month granularity.
///
/// Periods are written as `YYYY-MM`. A full date (`YYYY-MM-DD`) is also
/// accepted and collapses onto the month containing it.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
/// use chrono::NaiveDate;
///
/// let period: PayrollPeriod = "2025-03-01".parse().unwrap();
/// assert_eq!(period.to_string(), "2025-03");
/// assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
/// assert_eq!(period.end_date(), NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PayrollPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl PayrollPeriod {
    /// Creates the period for a calendar month.
    pub fn from_month(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidPeriod {
            value: format!("{:04}-{:02}", year, month),
            message: "not a valid calendar month".to_string(),
        };

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next_month
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self { start, end })
    }

    /// Returns the period containing the given date.
    pub fn containing(date: NaiveDate) -> EngineResult<Self> {
        Self::from_month(date.year(), date.month())
    }

    /// The first calendar day of the period.
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// The last calendar day of the period.
    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every Monday-to-Friday date in the period, in order.
    pub fn working_days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .collect()
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.start.year(), self.start.month())
    }
}

impl FromStr for PayrollPeriod {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = |message: &str| EngineError::InvalidPeriod {
            value: s.to_string(),
            message: message.to_string(),
        };

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Self::containing(date);
        }

        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| invalid("expected YYYY-MM or YYYY-MM-DD"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| invalid("year is not a number"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| invalid("month is not a number"))?;

        Self::from_month(year, month).map_err(|_| invalid("not a valid calendar month"))
    }
}

impl TryFrom<String> for PayrollPeriod {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PayrollPeriod> for String {
    fn from(period: PayrollPeriod) -> Self {
        period.to_string()
    }
}
