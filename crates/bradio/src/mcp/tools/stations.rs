use crate::directory::StationDirectory;
use crate::prelude::{eprintln, *};
use bradio_core::query::{QueryRequest, StationQuery};
use bradio_core::render::{build_output, format_output_json};
use serde::Deserialize;

use super::CallToolResult;

const SEARCH_FAILED: &str = "Failed to search stations";
const POPULAR_FAILED: &str = "Failed to get popular stations";

#[derive(Deserialize, Default)]
struct StationArgs {
    name: Option<serde_json::Value>,
    tag: Option<serde_json::Value>,
    limit: Option<serde_json::Value>,
}

impl StationArgs {
    fn parse(arguments: Option<serde_json::Value>) -> Result<Self, Error> {
        match arguments {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| Error::invalid_argument(format!("Invalid arguments: {e}"))),
        }
    }
}

/// Read a required, non-empty string argument.
fn required_string(value: Option<serde_json::Value>, field: &str) -> Result<String, Error> {
    match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Ok(s),
        _ => Err(Error::invalid_argument(format!(
            "{field} parameter is required and must be a string"
        ))),
    }
}

/// MCP clients send JSON numbers; fractional limits are truncated.
fn limit_argument(value: Option<serde_json::Value>) -> Result<Option<i64>, Error> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))),
        Some(_) => Err(Error::invalid_argument("limit must be an integer")),
    }
}

pub async fn handle_search_by_name<D: StationDirectory>(
    arguments: Option<serde_json::Value>,
    directory: &D,
    global: &crate::Global,
) -> CallToolResult {
    let request = StationArgs::parse(arguments).and_then(|args| {
        Ok(QueryRequest::by_name(
            required_string(args.name, "name")?,
            limit_argument(args.limit)?,
        ))
    });

    run_tool("search_by_name", SEARCH_FAILED, request, directory, global).await
}

pub async fn handle_search_by_tag<D: StationDirectory>(
    arguments: Option<serde_json::Value>,
    directory: &D,
    global: &crate::Global,
) -> CallToolResult {
    let request = StationArgs::parse(arguments).and_then(|args| {
        Ok(QueryRequest::by_tag(
            required_string(args.tag, "tag")?,
            limit_argument(args.limit)?,
        ))
    });

    run_tool("search_by_tag", SEARCH_FAILED, request, directory, global).await
}

pub async fn handle_get_popular_stations<D: StationDirectory>(
    arguments: Option<serde_json::Value>,
    directory: &D,
    global: &crate::Global,
) -> CallToolResult {
    let request = StationArgs::parse(arguments)
        .and_then(|args| Ok(QueryRequest::popular(limit_argument(args.limit)?)));

    run_tool("get_popular_stations", POPULAR_FAILED, request, directory, global).await
}

async fn run_tool<D: StationDirectory>(
    tool: &str,
    failure: &str,
    request: Result<QueryRequest, Error>,
    directory: &D,
    global: &crate::Global,
) -> CallToolResult {
    let query = match request.and_then(QueryRequest::validate) {
        Ok(query) => query,
        Err(e) => return CallToolResult::error(e.to_string()),
    };

    if global.verbose {
        eprintln!(
            "Calling {tool}: term={:?}, limit={}",
            query.term(),
            query.limit()
        );
    }

    match search(&query, directory, failure).await {
        Ok(text) => CallToolResult::text(text),
        Err(e) => {
            log::warn!("{tool} failed: {e}");
            CallToolResult::error(e.to_string())
        }
    }
}

async fn search<D: StationDirectory>(
    query: &StationQuery,
    directory: &D,
    failure: &str,
) -> Result<String, Error> {
    let stations = directory.fetch(query).await.map_err(|e| match e {
        Error::ExternalService(msg) => Error::external(format!("{failure}: {msg}")),
        other => other,
    })?;

    format_output_json(&build_output(query, &stations))
}
