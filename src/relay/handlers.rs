use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State, rejection::BytesRejection},
    http::{Method, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use super::Relay;
use super::dto::{ChatReply, ChatRequest};
use crate::service;

pub fn build_router(state: Arc<Relay>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    // Build router
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat_handler));
    with_layers(router).layer(cors).with_state(state)
}

/// Messages are forwarded whatever their size, and panics still answer with the
/// failure envelope.
fn with_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(DefaultBodyLimit::disable())
        .layer(CatchPanicLayer::custom(service::panic_response))
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

#[tracing::instrument(name = "chat", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn chat_handler(
    State(relay): State<Arc<Relay>>,
    body: Result<Bytes, BytesRejection>,
) -> service::Result<Json<ChatReply>> {
    let outcome = match body {
        Ok(body) => relay_message(&relay, &body).await,
        Err(rejection) => Err(service::Error::BadRequest(rejection.body_text().into())),
    };
    match outcome {
        Ok(reply) => {
            tracing::info!(reply = %reply, "Reply extracted");
            Ok(Json(reply.into()))
        }
        Err(error) => {
            tracing::error!(kind = error.kind(), error = ?error, "Chat relay failed: {}", error);
            Err(error)
        }
    }
}

async fn relay_message(relay: &Relay, body: &[u8]) -> service::Result<Box<str>> {
    let request = ChatRequest::from_slice(body)?;
    tracing::info!(message = %request.message, "Chat message received");
    Ok(relay.reply(request.message).await?)
}
