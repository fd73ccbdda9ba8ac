use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;
use tokio::net::TcpListener;

pub mod dto;
mod handlers;

pub use handlers::build_router;

use crate::config::{RelayConfig, UpstreamConfig};
use crate::infer::{ApiError, Client};
use crate::prompts;

/// Shared, read-only state behind every `/chat` call.
pub struct Relay {
    client: Client,
    persona: Box<str>,
}

impl Relay {
    pub fn new(upstream: UpstreamConfig, persona: Box<str>) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::new(upstream)?,
            persona,
        })
    }

    /// One full upstream round-trip: persona plus `message`, reply text back.
    pub async fn reply(&self, message: Value) -> Result<Box<str>, ApiError> {
        let messages = [prompts::system(&self.persona), prompts::user(message)];
        self.client.complete(&messages).await
    }
}

pub async fn serve(config: RelayConfig) -> anyhow::Result<()> {
    tracing::debug!("Relay configuration: {:?}", config);

    let relay = Relay::new(config.upstream, config.persona)
        .context("Failed to build the completion API client")?;
    tracing::info!(
        model = %relay.client.config().model,
        api_url = %relay.client.config().api_url,
        "Relaying chat to completion API"
    );
    if relay.client.config().timeout.is_none() {
        tracing::warn!("No upstream timeout configured, a stalled completion call blocks its request");
    }

    let router = build_router(Arc::new(relay));

    // Start server
    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    tracing::info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
