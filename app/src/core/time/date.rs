use std::fmt::Display;
use std::str::FromStr;

use chrono::{Days, NaiveDate};

use super::DateTime;

//Calendar day without time-of-day, serialized as YYYY-MM-DD
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Date {
    delegate: NaiveDate,
}

impl Date {
    pub fn today() -> Self {
        DateTime::now().date()
    }

    pub fn ymd(year: i32, month: u32, day: u32) -> anyhow::Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::from)
            .ok_or_else(|| anyhow::anyhow!("Invalid date {}-{}-{}", year, month, day))
    }

    pub fn days_before(&self, days: u64) -> Self {
        //failing only at the edges of what can be stored in a date
        self.delegate
            .checked_sub_days(Days::new(days))
            .map(Self::from)
            .unwrap_or(*self)
    }

    pub fn days_after(&self, days: u64) -> Self {
        self.delegate
            .checked_add_days(Days::new(days))
            .map(Self::from)
            .unwrap_or(*self)
    }

    /// Consecutive days ending with `self`, oldest first.
    pub fn window_ending_here(&self, days: i64) -> Vec<Date> {
        if days <= 0 {
            return vec![];
        }

        (0..days as u64).rev().map(|offset| self.days_before(offset)).collect()
    }

    /// Midnight of this day with an explicit `+00:00` offset.
    pub fn to_utc_midnight_string(&self) -> String {
        format!("{}T00:00:00+00:00", self.delegate.format("%Y-%m-%d"))
    }

    pub fn to_long_string(&self) -> String {
        self.delegate.format("%A, %B %-d, %Y").to_string()
    }
}

impl From<NaiveDate> for Date {
    fn from(delegate: NaiveDate) -> Self {
        Self { delegate }
    }
}

impl FromStr for Date {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?.into())
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.delegate.format("%Y-%m-%d"))
    }
}
