//! Lenient deserializers for fields written by older or foreign clients.
//!
//! Timestamps have been persisted as integers, floats and date strings over
//! time; all of them are read back as integer Unix milliseconds.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawTimestamp {
    #[allow(clippy::cast_possible_truncation)]
    fn into_millis(self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(value),
            Self::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            Self::Float(_) => None,
            Self::Text(text) => {
                let text = text.trim();
                text.parse::<i64>().ok().or_else(|| {
                    chrono::DateTime::parse_from_rfc3339(text)
                        .ok()
                        .map(|date| date.timestamp_millis())
                })
            }
        }
    }
}

/// Timestamp that defaults to 0 when missing, null or unparseable.
pub fn timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(raw.and_then(RawTimestamp::into_millis).unwrap_or(0))
}

/// Optional timestamp; null and unparseable values become `None`.
pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(raw.and_then(RawTimestamp::into_millis))
}

/// Boolean flag where null counts as false.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// String where null counts as empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub const fn is_false(value: &bool) -> bool {
    !*value
}
