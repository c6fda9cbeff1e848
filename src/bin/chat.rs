//! Terminal chat client
//!
//! Reads one message per line from stdin, relays it through a running
//! `chat-relay` server and prints the transcript as it grows. Lines entered
//! while a reply is pending are not sent.

use chat_relay::api::RelayReply;
use chat_relay::relay_client::{HttpRelayClient, RelayClient, RelayFailure};
use chat_relay::session::ChatSession;
use chat_relay::state_machine::{Message, Role};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinHandle};

const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8000";

const WELCOME: &str = "AI Chat\n\nType a message and press Enter. Ctrl-D to quit.";

type PendingCall = JoinHandle<Result<RelayReply, RelayFailure>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let base_url = std::env::var("RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());
    let client = Arc::new(HttpRelayClient::new(&base_url));
    tracing::debug!(endpoint = client.endpoint(), "Relay client ready");

    let mut session = ChatSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<PendingCall> = None;
    let mut rendered = 0;

    println!("{WELCOME}\n");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                session.set_input(line);
                if let Some(request) = session.submit() {
                    let client = client.clone();
                    pending = Some(tokio::spawn(async move { client.send(&request).await }));
                    rendered = render(&session, rendered);
                    println!("thinking...");
                } else if session.is_busy() {
                    println!("(still waiting for a reply, message not sent)");
                }
            }
            outcome = wait(&mut pending), if pending.is_some() => {
                pending = None;
                finish(&mut session, outcome);
                rendered = render(&session, rendered);
            }
        }
    }

    // Input closed; an outstanding call still runs to completion
    if pending.is_some() {
        let outcome = wait(&mut pending).await;
        finish(&mut session, outcome);
        render(&session, rendered);
    }

    Ok(())
}

async fn wait(pending: &mut Option<PendingCall>) -> Result<Result<RelayReply, RelayFailure>, JoinError> {
    match pending {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn finish(session: &mut ChatSession, outcome: Result<Result<RelayReply, RelayFailure>, JoinError>) {
    let outcome = outcome.unwrap_or_else(|e| Err(RelayFailure::Transport(e.to_string())));
    if let Err(e) = session.resolve(outcome) {
        tracing::error!(error = %e, "Relay outcome rejected");
    }
}

/// Print entries appended since `from`; returns the new high-water mark
fn render(session: &ChatSession, from: usize) -> usize {
    let messages = session.conversation().messages();
    for message in messages.iter().skip(from) {
        print_message(message);
    }
    messages.len()
}

fn print_message(message: &Message) {
    match message.role {
        Role::User => println!("you> {}\n", message.content),
        Role::Assistant => println!("{}\n", message.content),
    }
}
