use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static DATE_COMPONENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,4})-(\d{1,2})-(\d{1,2})").expect("hardcoded regex should be valid")
});

/// Calendar date stored as "YYYY-MM-DD".
///
/// Components are read straight from the string and never pass through a
/// timestamp, so no timezone can shift the day. Anything unparseable is
/// treated as absent.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct ISODateModel(pub NaiveDate);

impl ISODateModel {
    pub(crate) fn parse_lenient(s: &str) -> Option<Self> {
        let caps = DATE_COMPONENTS.captures(s)?;
        let y = caps.get(1)?.as_str().parse::<i32>().ok()?;
        let m = caps.get(2)?.as_str().parse::<u32>().ok()?;
        let d = caps.get(3)?.as_str().parse::<u32>().ok()?;
        if y == 0 {
            return None;
        }
        NaiveDate::from_ymd_opt(y, m, d).map(ISODateModel)
    }

    pub(crate) fn parse_optional(s: Option<&str>) -> Option<NaiveDate> {
        s.and_then(Self::parse_lenient).map(Into::into)
    }

    pub(crate) fn format(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}

impl Into<NaiveDate> for ISODateModel {
    fn into(self) -> NaiveDate {
        self.0
    }
}
