use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Naive layouts the backend emits for database timestamps (interpreted as UTC)
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Custom deserializer for timestamps that accepts integers (ms), RFC3339 strings
/// and naive `YYYY-MM-DD HH:MM:SS` strings
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => {
            // Assume it's a Unix timestamp in milliseconds
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| Error::custom("timestamp out of range"))
        }
        Value::String(s) => parse_timestamp(&s).map_err(Error::custom),
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = s.parse::<DateTime<Utc>>() {
        return Ok(ts);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid timestamp: {}", s))
}

/// Custom deserializer for opaque ids that may arrive as JSON strings or integers
pub fn deserialize_opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return Err(Error::custom("id must be a string or number")),
    };

    if id.is_empty() {
        return Err(Error::custom("id cannot be empty"));
    }

    Ok(id)
}
