//! Presenters for station results
//!
//! Two independent renderings of the same result list: one text line per
//! station for the terminal, and a structured document for MCP clients and
//! `--json` output. Both keep the order the directory returned.

use serde::Serialize;

use crate::error::Error;
use crate::query::{SearchMode, StationQuery};
use crate::station::{convert_station, DisplayStation, Station};

/// Converted station with its position in a popularity listing.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ListedStation {
    #[serde(flatten)]
    pub station: DisplayStation,
    /// 1-based rank, only set for [`SearchMode::Popular`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
}

/// Structured result document.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationsOutput {
    pub query: String,
    pub query_type: SearchMode,
    pub total_found: usize,
    pub stations: Vec<ListedStation>,
}

/// Format one station as `(clicks) name; tags; codec[bitrate]; url`.
pub fn format_station_line(station: &Station) -> String {
    format!(
        "({}) {}; {}; {}[{}]; {}",
        station.clickcount, station.name, station.tags, station.codec, station.bitrate, station.url
    )
}

/// Format every station on its own newline-terminated line.
pub fn format_station_lines(stations: &[Station]) -> String {
    stations
        .iter()
        .map(|station| format!("{}\n", format_station_line(station)))
        .collect()
}

/// Build the structured document for a query and the stations it returned.
pub fn build_output(query: &StationQuery, stations: &[Station]) -> StationsOutput {
    let ranked = query.mode() == SearchMode::Popular;

    let stations = stations
        .iter()
        .enumerate()
        .map(|(idx, station)| ListedStation {
            station: convert_station(station),
            rank: ranked.then_some(idx + 1),
        })
        .collect::<Vec<_>>();

    StationsOutput {
        query: query.display_term().to_string(),
        query_type: query.mode(),
        total_found: stations.len(),
        stations,
    }
}

pub fn format_output_json(output: &StationsOutput) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(output)?)
}
