use serde::{Deserialize, Deserializer};

/// Amounts in stored documents are usually numbers, but older records may
/// hold numeric strings or nulls. Anything unparseable reads as zero.
#[derive(Debug, serde_derive::Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
    Null(()),
}

pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => n,
        RawAmount::Text(s) => s.trim().replace(',', "").parse::<f64>().unwrap_or(0.0),
        RawAmount::Null(()) => 0.0,
    })
}

pub(crate) fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) => Some(n),
        RawAmount::Text(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        RawAmount::Null(()) => None,
    })
}
