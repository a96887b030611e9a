use crate::directory::RadioBrowserClient;
use crate::prelude::{eprintln, *};
use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

struct ServerState {
    global: crate::Global,
    directory: RadioBrowserClient,
}

pub async fn run_sse(
    options: super::cli::SseOptions,
    global: crate::Global,
    directory: RadioBrowserClient,
) -> Result<()> {
    if global.verbose {
        eprintln!(
            "Starting MCP server with SSE transport on {}:{}...",
            options.host, options.port
        );
    }

    let addr = format!("{}:{}", options.host, options.port);
    let verbose = global.verbose;

    let app_router = router(Arc::new(ServerState { global, directory }));

    if verbose {
        eprintln!("MCP server listening on http://{}", addr);
        eprintln!("SSE endpoint: http://{}/sse", addr);
        eprintln!("Message endpoint: http://{}/message", addr);
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/sse", get(sse_handler))
        .route("/message", post(message_handler))
        .layer(cors)
        .with_state(state)
}

async fn sse_handler(
    State(_state): State<Arc<ServerState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = stream::once(async { Ok(Event::default().data("MCP SSE endpoint ready")) });
    Sse::new(stream)
}

async fn message_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<serde_json::Value>,
) -> Response {
    let request_str = request.to_string();

    match super::handle_request(&request_str, &state.directory, &state.global).await {
        Some(response) => Json(serde_json::to_value(response).unwrap_or(serde_json::Value::Null))
            .into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn_server() -> String {
        let state = Arc::new(ServerState {
            global: crate::Global {
                api_base: "http://127.0.0.1:9".to_string(),
                verbose: false,
            },
            directory: RadioBrowserClient::new("http://127.0.0.1:9").unwrap(),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_message_endpoint_lists_tools() {
        let base = spawn_server().await;

        let response: serde_json::Value = reqwest::Client::new()
            .post(format!("{base}/message"))
            .json(&serde_json::json!({"jsonrpc": "2.0", "id": 7, "method": "tools/list"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(response["id"], 7);
        assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_message_endpoint_accepts_notifications() {
        let base = spawn_server().await;

        let response = reqwest::Client::new()
            .post(format!("{base}/message"))
            .json(&serde_json::json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_message_endpoint_tool_error_for_unreachable_directory() {
        let base = spawn_server().await;

        let response: serde_json::Value = reqwest::Client::new()
            .post(format!("{base}/message"))
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "get_popular_stations", "arguments": {"limit": 3}}
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(response["result"]["isError"], true);
    }
}
