//! Conversation session
//!
//! Owns one conversation's state, transcript and input buffer, and executes
//! the effects produced by [`transition`]. The presentation layer only calls
//! the methods here and renders [`ChatSession::snapshot`].

use crate::api::{RelayReply, RelayRequest};
use crate::relay_client::{RelayClient, RelayFailure};
use crate::state_machine::{transition, ConvState, Conversation, Effect, Event, Message, TransitionError};
use serde::Serialize;

/// What the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub busy: bool,
}

/// One conversation with its own busy flag
#[derive(Debug, Default)]
pub struct ChatSession {
    state: ConvState,
    conversation: Conversation,
    input: String,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.conversation.messages().to_vec(),
            busy: self.is_busy(),
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Edit the input buffer. Allowed while a call is outstanding.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Submit the input buffer.
    ///
    /// Returns the relay request to issue, or `None` if the submission was
    /// rejected (blank input, or a call already outstanding).
    pub fn submit(&mut self) -> Option<RelayRequest> {
        let text = self.input.clone();
        self.submit_text(text)
    }

    /// Submit `text` directly, bypassing the input buffer.
    pub fn submit_text(&mut self, text: impl Into<String>) -> Option<RelayRequest> {
        match self.apply(Event::Submit { text: text.into() }) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(state = ?self.state, reason = %e, "Submission ignored");
                None
            }
        }
    }

    /// Feed the outcome of the outstanding relay call back in.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidTransition`] if no call is outstanding.
    pub fn resolve(
        &mut self,
        outcome: Result<RelayReply, RelayFailure>,
    ) -> Result<(), TransitionError> {
        let event = match outcome {
            Ok(reply) => Event::RelayReply {
                message: reply.message,
            },
            Err(failure) => {
                tracing::warn!(error = %failure, "Relay call failed");
                Event::RelayFailed { failure }
            }
        };
        self.apply(event).map(|_| ())
    }

    /// Submit the input buffer and run the resulting call to completion.
    ///
    /// Returns `false` if the submission was rejected.
    pub async fn send<C: RelayClient + ?Sized>(&mut self, client: &C) -> bool {
        let Some(request) = self.submit() else {
            return false;
        };
        self.complete(client, &request).await;
        true
    }

    /// [`ChatSession::send`] for text that never went through the buffer.
    pub async fn send_text<C: RelayClient + ?Sized>(
        &mut self,
        client: &C,
        text: impl Into<String>,
    ) -> bool {
        let Some(request) = self.submit_text(text) else {
            return false;
        };
        self.complete(client, &request).await;
        true
    }

    async fn complete<C: RelayClient + ?Sized>(&mut self, client: &C, request: &RelayRequest) {
        let outcome = client.send(request).await;
        // We are Awaiting, so the outcome always applies
        if let Err(e) = self.resolve(outcome) {
            tracing::error!(error = %e, "Relay outcome rejected");
        }
    }

    /// Run one transition and execute its effects
    fn apply(&mut self, event: Event) -> Result<Option<RelayRequest>, TransitionError> {
        let result = transition(&self.state, event)?;
        self.state = result.new_state;

        let mut outgoing = None;
        for effect in result.effects {
            match effect {
                Effect::AppendMessage(message) => self.conversation.append(message),
                Effect::ClearInput => self.input.clear(),
                Effect::SendRelay(request) => outgoing = Some(request),
            }
        }
        Ok(outgoing)
    }
}
