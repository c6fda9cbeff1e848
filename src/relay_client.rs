//! Client side of `POST /api/chat`
//!
//! [`RelayClient`] is the seam between the conversation session and the
//! network; [`HttpRelayClient`] is the real implementation.

use crate::api::{RelayReply, RelayRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// Shown when the relay failed without saying why
pub const FALLBACK_RELAY_ERROR: &str = "Error communicating with AI";

/// Shown when the relay answered with something unexpected
pub const FALLBACK_UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Why a relay call produced no reply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayFailure {
    /// The relay answered with a non-success status
    #[error("relay returned HTTP {status}")]
    Status {
        status: u16,
        /// Structured error text from the response body, if any
        error: Option<String>,
    },
    /// The call never completed
    #[error("relay unreachable: {0}")]
    Transport(String),
    /// A success status with a body that is not a relay reply
    #[error("malformed relay reply: {0}")]
    Malformed(String),
}

impl RelayFailure {
    /// Text appended to the transcript in place of a reply
    #[must_use]
    pub fn fallback_text(&self) -> String {
        match self {
            RelayFailure::Status {
                error: Some(text), ..
            } => text.clone(),
            RelayFailure::Status { error: None, .. } | RelayFailure::Transport(_) => {
                FALLBACK_RELAY_ERROR.to_string()
            }
            RelayFailure::Malformed(_) => FALLBACK_UNKNOWN_ERROR.to_string(),
        }
    }

    /// Classify a non-success response body
    fn from_status(status: u16, body: &str) -> Self {
        let error = serde_json::from_str::<Value>(body).ok().and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(String::from))
                .filter(|text| !text.is_empty())
        });
        RelayFailure::Status { status, error }
    }
}

/// Something that can carry one message to the relay and bring back a reply
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn send(&self, request: &RelayRequest) -> Result<RelayReply, RelayFailure>;
}

/// Relay client over HTTP
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    client: Client,
    endpoint: String,
}

impl HttpRelayClient {
    /// `base_url` is the relay origin, e.g. `http://127.0.0.1:8000`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn send(&self, request: &RelayRequest) -> Result<RelayReply, RelayFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayFailure::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayFailure::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            tracing::debug!(status = %status, body = %body, "Relay call failed");
            // The relay's own `error` text is surfaced to the user in place of
            // the generic fallback; `message` is only consulted when it is absent.
            return Err(RelayFailure::from_status(status.as_u16(), &body));
        }

        serde_json::from_str::<RelayReply>(&body).map_err(|e| RelayFailure::Malformed(e.to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{create_router, AppState};
    use crate::llm::testing::MockLlmService;
    use crate::llm::LlmService;
    use std::sync::Arc;

    /// Serve a relay backed by `llm` on an ephemeral port
    async fn spawn_relay(llm: Option<Arc<dyn LlmService>>) -> String {
        let app = create_router(AppState::with_llm(llm));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_fallback_text() {
        let structured = RelayFailure::Status {
            status: 500,
            error: Some("API key not set".to_string()),
        };
        assert_eq!(structured.fallback_text(), "API key not set");

        let bare = RelayFailure::Status {
            status: 502,
            error: None,
        };
        assert_eq!(bare.fallback_text(), "Error communicating with AI");
        assert_eq!(
            RelayFailure::Transport("refused".into()).fallback_text(),
            "Error communicating with AI"
        );
        assert_eq!(
            RelayFailure::Malformed("missing field".into()).fallback_text(),
            "An unknown error occurred"
        );
    }

    #[test]
    fn test_status_body_prefers_error_over_message() {
        assert_eq!(
            RelayFailure::from_status(500, r#"{"error":"API key not set","message":"ignored"}"#),
            RelayFailure::Status {
                status: 500,
                error: Some("API key not set".to_string())
            }
        );
    }

    #[test]
    fn test_status_body_parsing() {
        assert_eq!(
            RelayFailure::from_status(400, r#"{"error":"No message provided"}"#),
            RelayFailure::Status {
                status: 400,
                error: Some("No message provided".to_string())
            }
        );
        assert_eq!(
            RelayFailure::from_status(500, r#"{"message":"down for maintenance"}"#),
            RelayFailure::Status {
                status: 500,
                error: Some("down for maintenance".to_string())
            }
        );
        assert_eq!(
            RelayFailure::from_status(502, "<html>Bad Gateway</html>"),
            RelayFailure::Status {
                status: 502,
                error: None
            }
        );
        assert_eq!(
            RelayFailure::from_status(500, r#"{"error":""}"#),
            RelayFailure::Status {
                status: 500,
                error: None
            }
        );
    }

    #[tokio::test]
    async fn test_round_trip_through_relay() {
        let mock = Arc::new(MockLlmService::new());
        mock.queue_text("Hi back");
        let origin = spawn_relay(Some(mock as Arc<dyn LlmService>)).await;

        let client = HttpRelayClient::new(&origin);
        let reply = client.send(&RelayRequest::new("Hi")).await.unwrap();
        assert_eq!(reply.message, "Hi back");
    }

    #[tokio::test]
    async fn test_structured_error_from_relay() {
        let origin = spawn_relay(None).await;

        let client = HttpRelayClient::new(&origin);
        let failure = client.send(&RelayRequest::new("Hi")).await.unwrap_err();
        assert_eq!(
            failure,
            RelayFailure::Status {
                status: 500,
                error: Some("API key not set".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpRelayClient::new(&format!("http://{addr}/"));
        assert_eq!(client.endpoint(), format!("http://{addr}/api/chat"));

        let failure = client.send(&RelayRequest::new("Hi")).await.unwrap_err();
        assert!(matches!(failure, RelayFailure::Transport(_)));
        assert_eq!(failure.fallback_text(), "Error communicating with AI");
    }
}
