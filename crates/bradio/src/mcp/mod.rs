mod cli;
mod sse;
mod stdio;
mod tools;

pub use cli::{App, Commands};

use crate::directory::{RadioBrowserClient, StationDirectory};
use crate::prelude::*;
use serde::{Deserialize, Serialize};

// JSON-RPC 2.0 types
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<serde_json::Value>,
    method: String,
    params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(-32700, message)
    }

    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self::new(-32601, message)
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(-32602, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(-32603, message)
    }

    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// MCP Protocol types
#[derive(Debug, Serialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

pub async fn run(app: App, global: crate::Global, directory: RadioBrowserClient) -> Result<()> {
    log::info!(
        "Starting bradio MCP server (directory: {})",
        directory.api_base()
    );

    match app.command {
        Commands::Stdio => stdio::run_stdio(global, directory).await,
        Commands::Sse(options) => sse::run_sse(options, global, directory).await,
    }
}

/// Handle one JSON-RPC message.
///
/// Returns `None` for notifications (any request without an `id`), which
/// never get a response.
pub async fn handle_request<D: StationDirectory>(
    request_str: &str,
    directory: &D,
    global: &crate::Global,
) -> Option<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_str(request_str) {
        Ok(req) => req,
        Err(e) => {
            return Some(JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(JsonRpcError::parse_error(format!("Parse error: {e}"))),
            });
        }
    };

    if request.id.is_none() {
        log::debug!("Ignoring notification {}", request.method);
        return None;
    }

    let result = match request.method.as_str() {
        "initialize" => tools::handle_initialize(),
        "ping" => Ok(serde_json::json!({})),
        "tools/list" => tools::handle_tools_list(),
        "tools/call" => tools::handle_tools_call(request.params, directory, global).await,
        method => Err(JsonRpcError::method_not_found(format!(
            "Method not found: {method}"
        ))),
    };

    Some(match result {
        Ok(value) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id,
            result: Some(value),
            error: None,
        },
        Err(error) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id,
            result: None,
            error: Some(error),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bradio_core::query::StationQuery;
    use bradio_core::station::Station;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EmptyDirectory;

    impl StationDirectory for EmptyDirectory {
        async fn fetch(&self, _query: &StationQuery) -> Result<Vec<Station>, Error> {
            Ok(vec![])
        }
    }

    #[derive(Default)]
    struct CountingDirectory {
        calls: AtomicUsize,
    }

    impl StationDirectory for CountingDirectory {
        async fn fetch(&self, _query: &StationQuery) -> Result<Vec<Station>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    fn global() -> crate::Global {
        crate::Global {
            api_base: "http://localhost".to_string(),
            verbose: false,
        }
    }

    async fn call(request: &str) -> Option<serde_json::Value> {
        handle_request(request, &EmptyDirectory, &global())
            .await
            .map(|response| serde_json::to_value(response).unwrap())
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = call(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#)
            .await
            .unwrap();

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "bradio");
        assert!(response.get("error").is_none());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let response = call("{not json").await.unwrap();
        assert_eq!(response["error"]["code"], -32700);
        assert!(response["id"].is_null());
    }

    #[tokio::test]
    async fn test_method_not_found() {
        let response = call(r#"{"jsonrpc":"2.0","id":"a","method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(response["id"], "a");
        assert_eq!(response["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let response = call(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_request_without_id_has_no_response() {
        let directory = CountingDirectory::default();

        for request in [
            r#"{"jsonrpc":"2.0","method":"tools/list"}"#,
            r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"get_popular_stations"}}"#,
        ] {
            let response = handle_request(request, &directory, &global()).await;
            assert!(response.is_none(), "{request}");
        }

        assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ping() {
        let response = call(r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(response["result"], serde_json::json!({}));
    }
}
