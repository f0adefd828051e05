use iso_currency::Currency;

/// Installation-level settings. Loadable from RON, every field optional.
#[derive(Debug, Clone, PartialEq, serde_derive::Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub currency: Currency,
    /// Export file names are `{export_prefix}-YYYY-MM-DD.csv`.
    pub export_prefix: String,
    pub export_title: String,
    /// Months past the current one shown in rent ranges, so advance payments
    /// can be recorded before the month begins.
    pub lookahead_months: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency: Currency::INR,
            export_prefix: "ashiana-pg".to_string(),
            export_title: "ASHIANA PG MANAGER — DATA EXPORT".to_string(),
            lookahead_months: 1,
        }
    }
}
