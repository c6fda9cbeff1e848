//! HTTP surface of the relay
//!
//! A single stateless endpoint that forwards one user message to the
//! completion provider per call.

mod handlers;
mod types;

pub use handlers::{create_router, RelayError};
pub use types::*;

use crate::config::RelayConfig;
use crate::llm::LlmService;
use std::sync::Arc;

/// Application state shared across handlers
///
/// Read-only after startup; concurrent requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Absent when no provider credential is configured
    pub llm: Option<Arc<dyn LlmService>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: &RelayConfig) -> Self {
        Self::with_llm(config.llm_service())
    }

    #[must_use]
    pub fn with_llm(llm: Option<Arc<dyn LlmService>>) -> Self {
        Self { llm }
    }
}
