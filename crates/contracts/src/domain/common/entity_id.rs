//! Serde helpers for backend identifiers and nullable text columns.
//!
//! The backend serializes primary keys as JSON numbers, but some endpoints
//! (and the browser-side caches) carry them as strings. On our side every
//! identifier is a canonical `String`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Flag(bool),
}

impl RawValue {
    fn into_canonical(self) -> String {
        match self {
            RawValue::Unsigned(v) => v.to_string(),
            RawValue::Signed(v) => v.to_string(),
            RawValue::Float(v) if v.fract() == 0.0 => format!("{}", v as i64),
            RawValue::Float(v) => v.to_string(),
            RawValue::Text(s) => s.trim().to_string(),
            RawValue::Flag(b) => b.to_string(),
        }
    }
}

/// Required identifier: accepts `17` or `"17"`, produces `"17"`.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawValue::deserialize(deserializer).map(RawValue::into_canonical)
}

/// Optional identifier or code: `null`, missing and `""` all become `None`.
pub fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawValue>::deserialize(deserializer)?;
    Ok(raw
        .map(RawValue::into_canonical)
        .filter(|s| !s.is_empty()))
}

/// Text column that may arrive as `null`.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawValue>::deserialize(deserializer)?;
    Ok(raw.map(RawValue::into_canonical).unwrap_or_default())
}

/// Optional text column; blank strings are kept as `None`.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    opt_id_string(deserializer)
}
