use std::{fmt, str::FromStr};

use chrono::{Datelike as _, NaiveDate};

/// Calendar month used as the granularity for rent and payment tracking.
///
/// Ordering is chronological (year, then month), which matches the
/// lexicographic ordering of the "YYYY-MM" string form.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Returns None if `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month containing the given calendar date. No timezone conversion is
    /// involved, the date's own components are used.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn next(self) -> Self {
        self.plus_months(1)
    }

    pub fn plus_months(self, n: u32) -> Self {
        let index = self.index() + i64::from(n);
        Self::from_index(index)
    }

    /// Number of months from `self` to `other` (negative if `other` is
    /// earlier).
    pub fn months_until(&self, other: &MonthKey) -> i64 {
        other.index() - self.index()
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InvalidMonthKey(pub String);

impl fmt::Display for InvalidMonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month key '{}'", self.0)
    }
}

impl FromStr for MonthKey {
    type Err = InvalidMonthKey;

    /// Accepts "YYYY-MM" (a trailing "-DD" is tolerated and ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('-');
        let year = parts.next().and_then(|y| y.parse::<i32>().ok());
        let month = parts.next().and_then(|m| m.parse::<u32>().ok());
        match (year, month) {
            (Some(year), Some(month)) if year > 0 => {
                MonthKey::new(year, month).ok_or_else(|| InvalidMonthKey(s.to_string()))
            }
            _ => Err(InvalidMonthKey(s.to_string())),
        }
    }
}
