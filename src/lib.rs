//! Chat relay
//!
//! A single-turn conversational relay: a stateless HTTP endpoint that
//! forwards one user message to a completion provider, and the client-side
//! session state machine that drives it.

pub mod api;
pub mod config;
pub mod llm;
pub mod preprocess;
pub mod relay_client;
pub mod session;
pub mod state_machine;
