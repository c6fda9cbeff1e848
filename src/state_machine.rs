//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! [`crate::session::ChatSession`] executes the effects.

mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ConvState, Conversation, Message, Role};
pub use transition::{transition, TransitionError, TransitionResult};
