//! Effects produced by state transitions

use super::state::Message;
use crate::api::RelayRequest;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append an entry to the transcript
    AppendMessage(Message),

    /// Empty the input buffer
    ClearInput,

    /// Issue exactly one relay call
    SendRelay(RelayRequest),
}

impl Effect {
    #[must_use]
    pub fn append_user(content: impl Into<String>) -> Self {
        Effect::AppendMessage(Message::user(content))
    }

    #[must_use]
    pub fn append_assistant(content: impl Into<String>) -> Self {
        Effect::AppendMessage(Message::assistant(content))
    }

    #[must_use]
    pub fn send_relay(message: impl Into<String>) -> Self {
        Effect::SendRelay(RelayRequest::new(message))
    }
}
