//! Queue module for RabbitMQ operations.
//!
//! This module provides:
//! - The envelope message type and broker constants
//! - The one-shot publisher and the sink trait the web layer publishes through
//!
//! ## Flow
//!
//! ```text
//! Web Server → Envelope → `logs` topic exchange → routing key → consumer
//! ```

pub mod publisher;
pub mod types;

pub use publisher::{EnvelopeSink, PublishError, Publisher};
pub use types::{
    Envelope, ENVELOPE_METHOD, ENVELOPE_TYPE, EXCHANGE, MESSAGE_CONTENT_TYPE,
};
