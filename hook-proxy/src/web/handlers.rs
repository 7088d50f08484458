//! Deploy webhook handler.
//!
//! One handler serves every path. It:
//! 1. Buffers the body
//! 2. Builds the envelope (400 if the request is unusable)
//! 3. Publishes the envelope and returns 200 whatever the broker did

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::envelope::build_envelope;
use crate::queue::EnvelopeSink;

/// Shared application state.
#[derive(Clone)]
pub struct AppState<S> {
    pub sink: S,
}

impl<S: EnvelopeSink> AppState<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

/// Build the router with `deploy_webhook` bound to every path and method.
pub fn router<S: EnvelopeSink>(state: AppState<S>) -> Router {
    Router::new()
        .fallback(deploy_webhook::<S>)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Deploy webhook endpoint.
pub async fn deploy_webhook<S: EnvelopeSink>(
    State(state): State<AppState<S>>,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path();

    let body = match to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(e) => {
            error!(path = %path, error = %e, "webhook_body_read_failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    info!(
        path = %path,
        content_type = ?content_type,
        body_length = body.len(),
        "webhook_received"
    );

    let envelope = match build_envelope(&body, content_type, path) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(path = %path, error = %e, "webhook_rejected");
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    };

    let message = match envelope.to_json_bytes() {
        Ok(message) => message,
        Err(e) => {
            error!(hash = %envelope.hash, error = %e, "envelope_serialize_failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    info!(
        hash = %envelope.hash,
        envelope = %String::from_utf8_lossy(&message),
        "webhook_publishing"
    );

    // Outcome is logged by the sink; the caller always sees 200.
    state.sink.publish(message).await;

    StatusCode::OK.into_response()
}
