//! Station records and their conversion
//!
//! [`Station`] mirrors the JSON the Radio Browser directory returns. The
//! directory is not strict about types (vote counts and check flags show up
//! both as numbers and as strings), so every field is optional on the wire
//! and deserialized leniently.
//!
//! [`DisplayStation`] is the shape we hand to clients: tags split into a
//! list and the vote count parsed to a number.

use serde::{Deserialize, Deserializer, Serialize};

/// Station as returned by the directory service.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Station {
    pub stationuuid: String,
    pub name: String,
    pub url: String,
    pub url_resolved: String,
    pub homepage: String,
    pub favicon: String,
    /// Comma separated tag list, as entered by the station submitter.
    pub tags: String,
    pub country: String,
    pub countrycode: String,
    pub language: String,
    pub codec: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub bitrate: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub clickcount: u64,
    #[serde(deserialize_with = "lenient_i64")]
    pub clicktrend: i64,
    /// Vote count, kept as text until conversion.
    #[serde(deserialize_with = "text_or_number")]
    pub votes: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub lastcheckok: bool,
}

/// Station shaped for output.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayStation {
    pub id: String,
    pub name: String,
    pub url: String,
    pub tags: Vec<String>,
    pub country: String,
    pub language: String,
    pub codec: String,
    pub bitrate: u64,
    pub click_count: u64,
    pub click_trend: i64,
    pub votes: u64,
    pub last_check_ok: bool,
}

/// Split a comma separated tag field, trimming each tag and dropping empty ones.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a textual vote count, or `0` when it is not a number.
pub fn parse_votes(votes: &str) -> u64 {
    votes.trim().parse().unwrap_or(0)
}

/// Whether [`parse_votes`] had to fall back to its default.
pub fn votes_defaulted(votes: &str) -> bool {
    votes.trim().parse::<u64>().is_err()
}

/// Project a directory station into its output shape. Never fails.
pub fn convert_station(station: &Station) -> DisplayStation {
    DisplayStation {
        id: station.stationuuid.clone(),
        name: station.name.clone(),
        url: station.url.clone(),
        tags: split_tags(&station.tags),
        country: station.country.clone(),
        language: station.language.clone(),
        codec: station.codec.clone(),
        bitrate: station.bitrate,
        click_count: station.clickcount,
        click_trend: station.clicktrend,
        votes: parse_votes(&station.votes),
        last_check_ok: station.lastcheckok,
    }
}

pub fn convert_stations(stations: &[Station]) -> Vec<DisplayStation> {
    stations.iter().map(convert_station).collect()
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        serde_json::Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
