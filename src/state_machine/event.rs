//! Events that can occur in a conversation

use crate::relay_client::RelayFailure;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user submitted the input buffer
    Submit { text: String },
    /// The relay call returned a reply
    RelayReply { message: String },
    /// The relay call failed
    RelayFailed { failure: RelayFailure },
}
