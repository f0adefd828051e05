use chrono::NaiveDate;

use crate::entities::{Clock, MonthKey};

pub fn current_month_key(clock: &dyn Clock) -> MonthKey {
    MonthKey::of(clock.today())
}

/// Every calendar month from `start`'s month through `current` plus
/// `lookahead` months, inclusive and ascending.
///
/// Empty if `start` is absent, or if its month already lies past the end
/// bound (a future-dated join with no lookahead reaching it).
pub fn month_range(start: Option<NaiveDate>, current: MonthKey, lookahead: u32) -> Vec<MonthKey> {
    let Some(start) = start else {
        return Vec::new();
    };
    let first = MonthKey::of(start);
    let last = current.plus_months(lookahead);
    let len = first.months_until(&last) + 1;
    if len <= 0 {
        return Vec::new();
    }
    std::iter::successors(Some(first), |m| Some(m.next()))
        .take(len as usize)
        .collect()
}
