//! Mock Proxima gateway for integration tests
//!
//! Serves the unified chat endpoint and the system endpoints with canned
//! payloads and records what each request carried

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// How the chat endpoint answers
#[derive(Debug, Clone)]
pub enum ChatReply {
    /// Echo the message back as a completion
    Completion,
    /// Answer with a fixed status, content type and body
    Error {
        status: StatusCode,
        content_type: &'static str,
        body: String,
    },
    /// Wait before answering with a completion
    Stall(Duration),
}

/// A request as the gateway saw it
#[derive(Debug, Clone)]
pub struct Received {
    pub path: &'static str,
    pub body: Option<Value>,
    pub authorization: Option<String>,
}

/// Mock gateway bound to a random local port
pub struct MockProxima {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    reply: ChatReply,
    chat_count: AtomicU32,
    received: Mutex<Vec<Received>>,
}

impl MockState {
    fn record(&self, path: &'static str, headers: &HeaderMap, body: Option<Value>) {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        self.received.lock().unwrap().push(Received {
            path,
            body,
            authorization,
        });
    }
}

impl MockProxima {
    /// Start a gateway that answers chat calls with completions
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(ChatReply::Completion).await
    }

    /// Start a gateway with a specific chat behavior
    pub async fn start_with(reply: ChatReply) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            reply,
            chat_count: AtomicU32::new(0),
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat))
            .route("/v1/models", routing::get(handle_models))
            .route("/v1/functions", routing::get(handle_functions))
            .route("/v1/stats", routing::get(handle_stats))
            .route("/v1/conversations/new", routing::post(handle_new_conversation))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL to configure the client with
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of chat requests received
    pub fn chat_count(&self) -> u32 {
        self.state.chat_count.load(Ordering::Relaxed)
    }

    /// Every request received so far
    pub fn received(&self) -> Vec<Received> {
        self.state.received.lock().unwrap().clone()
    }
}

impl Drop for MockProxima {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Handlers --

async fn handle_chat(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.chat_count.fetch_add(1, Ordering::Relaxed);
    state.record("/v1/chat/completions", &headers, Some(body.clone()));

    match state.reply {
        ChatReply::Completion => Json(completion(&body)).into_response(),
        ChatReply::Error {
            status,
            content_type,
            body: ref error_body,
        } => (status, [(CONTENT_TYPE, content_type)], error_body.clone()).into_response(),
        ChatReply::Stall(delay) => {
            tokio::time::sleep(delay).await;
            Json(completion(&body)).into_response()
        }
    }
}

async fn handle_models(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    state.record("/v1/models", &headers, None);

    Json(json!({
        "object": "list",
        "data": [
            {"id": "chatgpt", "status": "ready"},
            {"id": "claude", "status": "ready"},
            {"id": "gemini", "status": "offline"},
        ],
    }))
}

async fn handle_functions(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    state.record("/v1/functions", &headers, None);

    Json(json!({
        "endpoint": "/v1/chat/completions",
        "functions": {
            "chat": {"params": ["message"]},
            "translate": {"params": ["message", "to", "from"]},
        },
    }))
}

async fn handle_stats(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    state.record("/v1/stats", &headers, None);

    Json(json!({
        "providers": {
            "claude": {"avgResponseTimeMs": 1500, "requests": 12},
        },
    }))
}

async fn handle_new_conversation(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record("/v1/conversations/new", &headers, Some(body));

    Json(json!({"success": true, "message": "conversations reset"}))
}

/// Completion payload echoing the request
fn completion(request: &Value) -> Value {
    let message = request["message"].as_str().unwrap_or_default();
    let model = request["model"].as_str().unwrap_or("auto");
    let function = request["function"].as_str().unwrap_or("chat");

    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": model,
        "function": function,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": format!("echo: {message}")},
            "finish_reason": "stop",
        }],
        "proxima": {"responseTimeMs": 42, "provider": format!("mock-{model}")},
    })
}
