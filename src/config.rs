//! Environment configuration for the relay server

use crate::llm::{LlmService, LoggingService, OpenAIService};
use std::sync::Arc;

const DEFAULT_PORT: u16 = 8000;

/// Relay server configuration
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Provider credential; requests fail with "API key not set" without it
    pub openai_api_key: Option<String>,
    /// Override for the provider origin (OpenAI-compatible gateways)
    pub openai_base_url: Option<String>,
    pub port: Option<u16>,
}

impl RelayConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_base_url: std::env::var("OPENAI_BASE_URL").ok(),
            port: std::env::var("RELAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok()),
        }
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// The configured credential, if it is present and non-empty
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Build the provider client, or `None` when no credential is configured
    #[must_use]
    pub fn llm_service(&self) -> Option<Arc<dyn LlmService>> {
        let api_key = self.api_key()?;
        let service: Arc<dyn LlmService> = Arc::new(OpenAIService::new(
            api_key.to_string(),
            self.openai_base_url.as_deref(),
        ));
        let logged: Arc<dyn LlmService> = Arc::new(LoggingService::new(service));
        Some(logged)
    }
}
