//! REST API endpoint handlers.
//!
//! Chat bodies are validated by hand from raw JSON so every shape problem
//! maps to a 400 with a readable `{error}` instead of axum's default
//! rejection text.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tutor_rs::conversation::ChatTurn;
use tutor_rs::mode::Mode;
use tutor_rs::tutor::{Tutor, TutorRequest};

const MESSAGE_ERROR: &str = "Message is required and must be a string";
const HISTORY_ERROR: &str = "History must be an array of {role, content} objects";
const BODY_ERROR: &str = "Request body must be valid JSON";

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub tutor: Arc<Tutor>,
}

/// Body of `GET /api/health`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Body of a successful `POST /api/chat`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub reply: String,
}

/// Body of every 4xx/5xx JSON response.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn bad_request(error: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
            details: None,
        }),
    )
}

/// 500 for failures the handler did not anticipate.
pub(crate) fn internal_error(details: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Failed to generate response".to_string(),
            details: Some(details.into()),
        }),
    )
}

fn mode_error() -> String {
    format!("Mode must be one of: {}", Mode::valid_tags())
}

/// Validate a raw chat body. Returns the 400 message on failure.
pub(crate) fn parse_chat_request(body: &Value) -> Result<TutorRequest, String> {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| MESSAGE_ERROR.to_string())?;

    let mode = body
        .get("mode")
        .and_then(Value::as_str)
        .and_then(|m| m.parse::<Mode>().ok())
        .ok_or_else(mode_error)?;

    let history = match body.get("history") {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => serde_json::from_value::<Vec<ChatTurn>>(raw.clone())
            .map_err(|_| HISTORY_ERROR.to_string())?,
    };

    let optional_text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(TutorRequest::new(message, mode)
        .with_history(history)
        .with_topic(optional_text("topic"))
        .with_language(optional_text("language")))
}

/// GET /api/health: Liveness probe. Always 200, no authentication.
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "LLM Tutor API is running",
    })
}

/// POST /api/chat: Answer a student message.
///
/// Returns 200 `{reply}` for every well-formed request: gateway failures are
/// answered from the demo fallback pool. Returns 400 `{error}` when the body
/// is not JSON or `message`/`mode`/`history` are invalid.
pub async fn post_chat(
    State(app): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!("Rejected chat body: {rejection}");
            return bad_request(BODY_ERROR).into_response();
        }
    };

    let request = match parse_chat_request(&body) {
        Ok(request) => request,
        Err(error) => return bad_request(error).into_response(),
    };

    let reply = app.tutor.reply(&request).await;
    Json(ChatResponse { reply: reply.text }).into_response()
}
