//! In-process stand-in for the Text-to-Speech REST endpoint
//!
//! Serves `POST /v1/text:synthesize` on an ephemeral localhost port and
//! records each request for later assertions.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use base64::Engine;
use serde_json::{json, Value};

/// How the mock responds
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Audio returned on success
    pub audio: Vec<u8>,
    /// Texts containing this marker get a 500
    pub fail_marker: Option<String>,
    /// Every request gets this status and raw body
    pub forced_error: Option<(u16, String)>,
    /// Succeed but leave out `audioContent`
    pub omit_audio: bool,
}

/// One captured request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    config: MockConfig,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Running mock server
pub struct MockTtsServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTtsServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Texts received, in order
    pub fn texts(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.body["input"]["text"].as_str().map(str::to_string))
            .collect()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    if method != Method::POST || uri.path() != "/v1/text:synthesize" {
        return StatusCode::NOT_FOUND.into_response();
    }

    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    if let Some((status, raw)) = &state.config.forced_error {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, raw.clone()).into_response();
    }

    let text = body["input"]["text"].as_str().unwrap_or_default();
    if let Some(marker) = &state.config.fail_marker {
        if text.contains(marker.as_str()) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": {"code": 500, "message": "Internal error encountered.", "status": "INTERNAL"}
                })),
            )
                .into_response();
        }
    }

    if state.config.omit_audio {
        return Json(json!({})).into_response();
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(&state.config.audio);
    Json(json!({ "audioContent": encoded })).into_response()
}

/// Start the mock on 127.0.0.1 with an ephemeral port
pub async fn spawn_mock_tts(config: MockConfig) -> MockTtsServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        config,
        requests: requests.clone(),
    };

    let app = Router::new().fallback(handle).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockTtsServer {
        base_url: format!("http://{}", addr),
        requests,
    }
}
