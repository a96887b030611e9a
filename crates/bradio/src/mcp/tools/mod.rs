mod stations;

use crate::directory::StationDirectory;
use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    pub fn text(text: String) -> Self {
        Self {
            content: vec![Content::Text { text }],
            is_error: None,
        }
    }

    /// Tool-level failure: the call went through, the tool could not answer.
    pub fn error(message: String) -> Self {
        Self {
            content: vec![Content::Text { text: message }],
            is_error: Some(true),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "bradio".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError::internal(format!("Internal error: {e}")))
}

fn limit_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "integer",
        "description": "Maximum number of results to return (default: 12, max: 1000)",
        "default": 12,
        "minimum": 1,
        "maximum": 1000
    })
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "search_by_name".to_string(),
            description: "Search for radio stations by name, sorted by popularity (click count). Broken stations are excluded. Returns each station's stream URL, tags, country, codec, bitrate, click count and votes.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name or partial name of the radio station to search for"
                    },
                    "limit": limit_schema()
                },
                "required": ["name"]
            }),
        },
        Tool {
            name: "search_by_tag".to_string(),
            description: "Search for radio stations carrying an exact tag (e.g. 'jazz', 'ambient'), sorted by recent popularity (click trend). Broken stations are excluded.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "tag": {
                        "type": "string",
                        "description": "The tag to search for (e.g., 'jazz', 'rock', 'electronic')"
                    },
                    "limit": limit_schema()
                },
                "required": ["tag"]
            }),
        },
        Tool {
            name: "get_popular_stations".to_string(),
            description: "Get the most popular radio stations globally, sorted by click count. Each station carries its 1-based rank.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "limit": limit_schema()
                },
                "required": []
            }),
        },
    ];

    let result = ToolsList { tools };

    serde_json::to_value(result).map_err(|e| JsonRpcError::internal(format!("Internal error: {e}")))
}

pub async fn handle_tools_call<D: StationDirectory>(
    params: Option<serde_json::Value>,
    directory: &D,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {e}")))?;

    let result = match params.name.as_str() {
        "search_by_name" | "search_radio_by_name" => {
            stations::handle_search_by_name(params.arguments, directory, global).await
        }
        "search_by_tag" | "search_radio_by_tag" => {
            stations::handle_search_by_tag(params.arguments, directory, global).await
        }
        "get_popular_stations" => {
            stations::handle_get_popular_stations(params.arguments, directory, global).await
        }
        _ => {
            return Err(JsonRpcError::invalid_params(format!(
                "Unknown tool: {}",
                params.name
            )))
        }
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError::internal(format!("Internal error: {e}")))
}
