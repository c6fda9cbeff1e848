//! HTTP request handlers

use super::types::{ErrorResponse, RelayReply};
use super::AppState;
use crate::llm::{LlmError, LlmRequest, RELAY_TEMPERATURE};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use thiserror::Error;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    // Preflight answers come from the CORS layer; plain responses get the
    // methods header from the set-header layer.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers(Any);
    let allow_methods = SetResponseHeaderLayer::if_not_present(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST"),
    );

    Router::new()
        .route("/api/chat", post(relay_chat))
        .route("/version", get(get_version))
        .with_state(state)
        .layer(allow_methods)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================
// Relay
// ============================================================

/// Forward one user message to the provider.
///
/// Checks run in order and the first failure wins: message present, then
/// credential configured, then the upstream call itself.
async fn relay_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RelayReply>, RelayError> {
    let message = extract_message(&body).ok_or(RelayError::NoMessage)?;

    let llm = state.llm.as_ref().ok_or_else(|| {
        tracing::warn!("Relay request rejected: OPENAI_API_KEY is not set");
        RelayError::ApiKeyNotSet
    })?;

    // Only the current message goes upstream; no earlier turns exist here
    let request = LlmRequest::single_user_turn(message, RELAY_TEMPERATURE);

    let response = llm.complete(&request).await.map_err(|e| {
        tracing::error!(error = %e, kind = ?e.kind, "Error connecting to AI API");
        RelayError::Upstream(e)
    })?;

    Ok(Json(RelayReply {
        message: response.text,
    }))
}

/// The non-empty string under `message`, if the body is a JSON object with one
fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(String::from)
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================
// Error Handling
// ============================================================

/// Failures of a relay call, as the client sees them
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No message provided")]
    NoMessage,
    #[error("API key not set")]
    ApiKeyNotSet,
    /// Upstream detail stays in the logs, never in the response body
    #[error("Error communicating with AI")]
    Upstream(#[source] LlmError),
}

impl RelayError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::NoMessage => StatusCode::BAD_REQUEST,
            RelayError::ApiKeyNotSet | RelayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.to_string()));
        (self.status(), body).into_response()
    }
}
