//! Chat relay server
//!
//! Serves `POST /api/chat`, forwarding each message to the completion
//! provider configured through `OPENAI_API_KEY`.

use chat_relay::api::{create_router, AppState};
use chat_relay::config::RelayConfig;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_relay=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = RelayConfig::from_env();

    if config.api_key().is_some() {
        tracing::info!(
            model = chat_relay::llm::RELAY_MODEL,
            base_url = config.openai_base_url.as_deref().unwrap_or("default"),
            "Completion provider configured"
        );
    } else {
        // Requests are still served; each one answers "API key not set"
        tracing::warn!("No provider credential configured. Set OPENAI_API_KEY.");
    }

    let app = create_router(AppState::new(&config));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port()));
    tracing::info!("Chat relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
