//! Query validation and request description
//!
//! Pure functions that turn a candidate query (as typed on the command line or
//! sent by an MCP client) into a validated [`StationQuery`], and describe the
//! single directory request that answers it. Nothing here performs I/O: the
//! shell crate takes [`StationQuery::endpoint`] and [`StationQuery::query_params`]
//! and hands them to its HTTP client.

use serde::Serialize;

use crate::error::Error;

/// Number of stations returned when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: u32 = 12;

/// Largest number of stations a single query may request.
pub const MAX_LIMIT: u32 = 1000;

/// Which kind of lookup a query performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchMode {
    #[serde(rename = "name")]
    ByName,
    #[serde(rename = "tag")]
    ByTag,
    #[serde(rename = "popular")]
    Popular,
}

impl SearchMode {
    /// Label used in structured output (`queryType`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::ByName => "name",
            SearchMode::ByTag => "tag",
            SearchMode::Popular => "popular",
        }
    }

    /// Sort order requested from the directory for this mode.
    pub fn sort_order(&self) -> SortOrder {
        match self {
            SearchMode::ByName | SearchMode::Popular => SortOrder::ClickCount,
            SearchMode::ByTag => SortOrder::ClickTrend,
        }
    }
}

/// Sort orders understood by the directory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    ClickCount,
    ClickTrend,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::ClickCount => "clickcount",
            SortOrder::ClickTrend => "clicktrend",
        }
    }
}

/// A query as received from a front end, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub popular: bool,
    pub limit: Option<i64>,
}

impl QueryRequest {
    pub fn by_name(name: impl Into<String>, limit: Option<i64>) -> Self {
        Self {
            name: Some(name.into()),
            limit,
            ..Default::default()
        }
    }

    pub fn by_tag(tag: impl Into<String>, limit: Option<i64>) -> Self {
        Self {
            tag: Some(tag.into()),
            limit,
            ..Default::default()
        }
    }

    pub fn popular(limit: Option<i64>) -> Self {
        Self {
            popular: true,
            limit,
            ..Default::default()
        }
    }

    /// Validate the request and normalize it into a [`StationQuery`].
    ///
    /// Exactly one of `name`, `tag` or `popular` must be selected. Blank terms
    /// count as missing.
    pub fn validate(self) -> Result<StationQuery, Error> {
        let name = normalize_term(self.name);
        let tag = normalize_term(self.tag);

        let (mode, term) = match (name, tag, self.popular) {
            (None, None, false) => {
                return Err(Error::invalid_argument(
                    "you must specify either --name or --tag",
                ))
            }
            (Some(_), Some(_), _) => {
                return Err(Error::invalid_argument(
                    "please specify either --name or --tag, not both",
                ))
            }
            (Some(_), None, true) | (None, Some(_), true) => {
                return Err(Error::invalid_argument(
                    "--popular cannot be combined with --name or --tag",
                ))
            }
            (Some(name), None, false) => (SearchMode::ByName, Some(name)),
            (None, Some(tag), false) => (SearchMode::ByTag, Some(tag)),
            (None, None, true) => (SearchMode::Popular, None),
        };

        let limit = validate_limit(self.limit)?;

        Ok(StationQuery { mode, term, limit })
    }
}

fn normalize_term(term: Option<String>) -> Option<String> {
    term.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Check a requested result count, falling back to [`DEFAULT_LIMIT`].
pub fn validate_limit(limit: Option<i64>) -> Result<u32, Error> {
    let limit = match limit {
        None => return Ok(DEFAULT_LIMIT),
        Some(limit) => limit,
    };

    if limit <= 0 {
        return Err(Error::invalid_argument(format!(
            "limit must be a positive number, got {limit}"
        )));
    }

    if limit > i64::from(MAX_LIMIT) {
        return Err(Error::invalid_argument(format!(
            "limit too high (max {MAX_LIMIT}), got {limit}"
        )));
    }

    Ok(limit as u32)
}

/// A validated query. Only [`QueryRequest::validate`] builds these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationQuery {
    mode: SearchMode,
    term: Option<String>,
    limit: u32,
}

impl StationQuery {
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// The search term. `None` for [`SearchMode::Popular`].
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Path of the directory endpoint answering this query, relative to the API base.
    pub fn endpoint(&self) -> String {
        let term = urlencoding::encode(self.term.as_deref().unwrap_or_default());
        match self.mode {
            SearchMode::ByName => format!("/json/stations/byname/{term}"),
            SearchMode::ByTag => format!("/json/stations/bytagexact/{term}"),
            SearchMode::Popular => "/json/stations".to_string(),
        }
    }

    /// Query string parameters shared by every mode: sort descending, skip
    /// broken stations, start at offset zero.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("order", self.mode.sort_order().as_param().to_string()),
            ("reverse", "true".to_string()),
            ("offset", "0".to_string()),
            ("limit", self.limit.to_string()),
            ("hidebroken", "true".to_string()),
        ]
    }

    /// Term echoed back in structured output.
    pub fn display_term(&self) -> &str {
        match self.mode {
            SearchMode::Popular => "popular_stations",
            _ => self.term.as_deref().unwrap_or_default(),
        }
    }
}
