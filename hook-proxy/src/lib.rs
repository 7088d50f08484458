//! Hook Proxy - deploy webhook to RabbitMQ bridge.
//!
//! ## Architecture
//!
//! ```text
//! Webhook → Web Server → build_envelope() → Publisher → `logs` exchange → consumer
//! ```
//!
//! Every request builds its envelope and opens its own broker connection. The
//! only state shared between requests is the read-only publisher settings.

pub mod cli;
pub mod config;
pub mod envelope;
pub mod queue;
pub mod web;

// Re-export commonly used types
pub use cli::Args;
pub use config::{AmqpConfig, Config, ConfigError};
pub use envelope::{build_envelope, EnvelopeError};
pub use queue::{Envelope, EnvelopeSink, PublishError, Publisher, EXCHANGE};
pub use web::AppState;
