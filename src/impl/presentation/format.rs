use chrono::NaiveDate;
use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};

use crate::entities::MonthKey;

/// "Jan 2026".
pub fn format_month(month: MonthKey) -> String {
    month
        .first_day()
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| month.to_string())
}

/// "05 Jan 2026", or "-" when the date is absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%d %b %Y").to_string())
}

/// Symbol-prefixed amount with Indian digit grouping ("₹1,50,000"). Whole
/// amounts carry no decimals; absent amounts format as zero.
pub fn format_currency(amount: Option<f64>, currency: Currency) -> String {
    let amount = amount.filter(|a| a.is_finite()).unwrap_or(0.0);
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    let integer_part = (abs.trunc() as i64).to_formatted_string(&Locale::en_IN);
    let cents = ((abs.fract() * 100.0).round() as i64).min(99);
    if cents == 0 {
        format!("{}{}{}", sign, currency.symbol(), integer_part)
    } else {
        format!("{}{}{}.{:02}", sign, currency.symbol(), integer_part, cents)
    }
}
