//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::api::RelayReply;
use crate::relay_client::RelayFailure;
use crate::session::ChatSession;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,12}"
}

fn arb_text() -> impl Strategy<Value = String> {
    "[ ]{0,3}[a-zA-Z0-9.!?,]{1,30}[ \n]{0,3}"
}

fn arb_failure() -> impl Strategy<Value = RelayFailure> {
    prop_oneof![
        (400u16..600, proptest::option::of("[a-zA-Z ]{1,30}"))
            .prop_map(|(status, error)| RelayFailure::Status { status, error }),
        "[a-z ]{0,20}".prop_map(RelayFailure::Transport),
        "[a-z ]{0,20}".prop_map(RelayFailure::Malformed),
    ]
}

fn arb_outcome() -> impl Strategy<Value = Result<RelayReply, RelayFailure>> {
    prop_oneof![
        "[a-zA-Z .!?]{0,60}".prop_map(|message| Ok(RelayReply { message })),
        arb_failure().prop_map(Err),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::Submit { text }),
        arb_blank().prop_map(|text| Event::Submit { text }),
        "[a-zA-Z .!?]{0,60}".prop_map(|message| Event::RelayReply { message }),
        arb_failure().prop_map(|failure| Event::RelayFailed { failure }),
    ]
}

/// A user action driven through a session
#[derive(Debug, Clone)]
enum Step {
    Submit(String),
    Resolve(Result<RelayReply, RelayFailure>),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        arb_text().prop_map(Step::Submit),
        arb_blank().prop_map(Step::Submit),
        arb_outcome().prop_map(Step::Resolve),
    ]
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![Just(ConvState::Idle), Just(ConvState::Awaiting)]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Whitespace-only submissions change nothing
    #[test]
    fn prop_blank_submit_is_noop(prior in proptest::collection::vec(arb_text(), 0..4), blank in arb_blank()) {
        let mut session = ChatSession::new();
        for text in prior {
            session.submit_text(text);
            let _ = session.resolve(Ok(RelayReply { message: "ok".to_string() }));
        }
        let before = session.snapshot();

        prop_assert!(session.submit_text(blank).is_none());
        prop_assert_eq!(session.snapshot(), before);
    }

    /// A non-empty submission while idle appends exactly one user entry,
    /// and exactly one assistant entry follows once the call resolves
    #[test]
    fn prop_submit_then_resolve_appends_two(text in arb_text(), outcome in arb_outcome()) {
        let mut session = ChatSession::new();

        let request = session.submit_text(text.clone());
        prop_assert_eq!(request.map(|r| r.message), Some(text.clone()));
        prop_assert_eq!(session.conversation().len(), 1);
        prop_assert_eq!(session.conversation().last(), Some(&Message::user(text)));
        prop_assert!(session.is_busy());

        prop_assert!(session.resolve(outcome).is_ok());
        prop_assert_eq!(session.conversation().len(), 2);
        prop_assert_eq!(session.conversation().last().map(|m| m.role), Some(Role::Assistant));
        prop_assert!(!session.is_busy());
    }

    /// Submissions while awaiting never add a second user entry
    #[test]
    fn prop_awaiting_rejects_submissions(first in arb_text(), others in proptest::collection::vec(arb_text(), 1..5)) {
        let mut session = ChatSession::new();
        session.submit_text(first);

        for text in others {
            prop_assert!(session.submit_text(text).is_none());
            prop_assert_eq!(session.conversation().len(), 1);
            prop_assert!(session.is_busy());
        }
    }

    /// Over any sequence of steps the transcript only grows, every user
    /// entry is immediately followed by exactly one assistant entry, and
    /// the busy flag is set exactly when the last entry is a user entry
    #[test]
    fn prop_transcript_alternates(steps in proptest::collection::vec(arb_step(), 0..30)) {
        let mut session = ChatSession::new();
        let mut previous: Vec<Message> = Vec::new();

        for step in steps {
            match step {
                Step::Submit(text) => { session.submit_text(text); }
                Step::Resolve(outcome) => { let _ = session.resolve(outcome); }
            }

            let current = session.conversation().messages();
            prop_assert!(current.len() >= previous.len());
            prop_assert_eq!(&current[..previous.len()], &previous[..]);
            prop_assert!(current.len() - previous.len() <= 1);
            previous = current.to_vec();

            for (i, message) in current.iter().enumerate() {
                let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
                prop_assert_eq!(message.role, expected);
            }
            let last_is_user = current.last().map(|m| m.role) == Some(Role::User);
            prop_assert_eq!(session.is_busy(), last_is_user);
        }
    }

    /// Transitions are deterministic
    #[test]
    fn prop_transition_is_pure(state in arb_state(), event in arb_event()) {
        let first = transition(&state, event.clone());
        let second = transition(&state, event);
        prop_assert_eq!(first, second);
    }

    /// Every successful transition toggles the busy flag and issues a relay
    /// call exactly when entering Awaiting
    #[test]
    fn prop_relay_call_iff_entering_awaiting(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, event) {
            prop_assert_ne!(result.new_state, state);
            let sends = result
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::SendRelay(_)))
                .count();
            let expected = usize::from(result.new_state == ConvState::Awaiting);
            prop_assert_eq!(sends, expected);
        }
    }
}
