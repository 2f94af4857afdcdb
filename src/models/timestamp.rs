//! Accepts either an RFC 3339 string or integer epoch seconds for record
//! timestamps. Serialization stays chrono's RFC 3339 default.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Epoch(i64),
    Text(String),
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Epoch(seconds) => Utc
            .timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| D::Error::custom(format!("epoch seconds out of range: {}", seconds))),
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| D::Error::custom(format!("invalid timestamp {:?}: {}", text, e))),
    }
}
