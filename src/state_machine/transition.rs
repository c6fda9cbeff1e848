//! Pure state transition function

use super::{ConvState, Effect, Event};
use crate::preprocess::reformat;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    #[must_use]
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
///
/// A rejected event leaves the state and transcript untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("A reply is still pending, cannot accept message")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
///
/// # Errors
///
/// Returns [`TransitionError::EmptyMessage`] for a blank submission,
/// [`TransitionError::Busy`] for a submission while a call is outstanding, and
/// [`TransitionError::InvalidTransition`] for a relay outcome while idle.
pub fn transition(state: &ConvState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Idle + Submit -> Awaiting
        (ConvState::Idle, Event::Submit { text }) => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyMessage);
            }
            Ok(TransitionResult::new(ConvState::Awaiting)
                .with_effect(Effect::append_user(text.clone()))
                .with_effect(Effect::ClearInput)
                .with_effect(Effect::send_relay(text)))
        }

        // Submissions while a call is outstanding are dropped, not queued
        (ConvState::Awaiting, Event::Submit { .. }) => Err(TransitionError::Busy),

        (ConvState::Awaiting, Event::RelayReply { message }) => Ok(TransitionResult::new(
            ConvState::Idle,
        )
        .with_effect(Effect::append_assistant(reformat(&message)))),

        (ConvState::Awaiting, Event::RelayFailed { failure }) => Ok(TransitionResult::new(
            ConvState::Idle,
        )
        .with_effect(Effect::append_assistant(failure.fallback_text()))),

        (ConvState::Idle, Event::RelayReply { .. } | Event::RelayFailed { .. }) => Err(
            TransitionError::InvalidTransition("relay outcome with no call outstanding".into()),
        ),
    }
}
