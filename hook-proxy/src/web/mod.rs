//! Web server module for handling deploy webhooks.
//!
//! The server is deliberately thin:
//! - Every path is routed to a single handler
//! - The body is normalized into an envelope
//! - The envelope is published to RabbitMQ, and the sender gets 200 either way
//!
//! Listening with or without TLS lives in [`server`].

pub mod handlers;
pub mod server;

pub use handlers::{deploy_webhook, router, AppState};
pub use server::{load_tls_config, serve};
