//! One-shot RabbitMQ publisher.
//!
//! Each publish opens its own connection, declares the `logs` topic exchange,
//! publishes a single persistent message and closes the connection again.
//! Nothing is pooled between calls and nothing is retried.

use std::future::Future;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use lapin::{
    options::{BasicPublishOptions, ExchangeDeclareOptions},
    types::FieldTable,
    BasicProperties, Connection, ConnectionProperties, ExchangeKind,
};
use thiserror::Error;
use tracing::{error, info, warn};

use super::types::{EXCHANGE, MESSAGE_CONTENT_TYPE};

/// Persistent delivery mode.
const DELIVERY_MODE_PERSISTENT: u8 = 2;

const EXCHANGE_KIND: ExchangeKind = ExchangeKind::Topic;

/// Destination for serialized envelopes.
///
/// Implementations swallow their own failures: callers have nothing to
/// inspect once the future resolves.
pub trait EnvelopeSink: Clone + Send + Sync + 'static {
    fn publish(&self, body: Vec<u8>) -> impl Future<Output = ()> + Send;
}

/// The broker step that failed.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("connection.open: {0}")]
    Connect(#[source] lapin::Error),

    #[error("channel.open: {0}")]
    Channel(#[source] lapin::Error),

    #[error("exchange.declare: {0}")]
    ExchangeDeclare(#[source] lapin::Error),

    #[error("basic.publish: {0}")]
    Publish(#[source] lapin::Error),
}

impl PublishError {
    /// AMQP method name of the failed step.
    pub fn stage(&self) -> &'static str {
        match self {
            PublishError::Connect(_) => "connection.open",
            PublishError::Channel(_) => "channel.open",
            PublishError::ExchangeDeclare(_) => "exchange.declare",
            PublishError::Publish(_) => "basic.publish",
        }
    }
}

/// RabbitMQ publisher with a connection per message.
#[derive(Clone)]
pub struct Publisher {
    inner: Arc<PublisherInner>,
}

struct PublisherInner {
    uri: String,
    routing_key: String,
}

impl Publisher {
    /// Create a publisher for the given broker URI and routing key.
    pub fn new(uri: String, routing_key: String) -> Self {
        Self {
            inner: Arc::new(PublisherInner { uri, routing_key }),
        }
    }

    pub fn routing_key(&self) -> &str {
        &self.inner.routing_key
    }

    /// Make a single publish attempt.
    ///
    /// The connection is closed before returning, whichever step failed.
    pub async fn try_publish(&self, body: &[u8]) -> Result<(), PublishError> {
        let conn = Connection::connect(&self.inner.uri, ConnectionProperties::default())
            .await
            .map_err(PublishError::Connect)?;

        let result = self.publish_on(&conn, body).await;

        if let Err(e) = conn.close(200, "OK").await {
            warn!(error = %e, "rabbitmq_connection_close_error");
        }

        result
    }

    async fn publish_on(&self, conn: &Connection, body: &[u8]) -> Result<(), PublishError> {
        let channel = conn.create_channel().await.map_err(PublishError::Channel)?;

        channel
            .exchange_declare(
                EXCHANGE,
                EXCHANGE_KIND,
                exchange_options(),
                FieldTable::default(),
            )
            .await
            .map_err(PublishError::ExchangeDeclare)?;

        channel
            .basic_publish(
                EXCHANGE,
                &self.inner.routing_key,
                BasicPublishOptions::default(),
                body,
                message_properties(unix_now()),
            )
            .await
            .map_err(PublishError::Publish)?
            .await
            .map_err(PublishError::Publish)?;

        Ok(())
    }
}

/// Durable, never auto-deleted.
fn exchange_options() -> ExchangeDeclareOptions {
    ExchangeDeclareOptions {
        durable: true,
        auto_delete: false,
        ..Default::default()
    }
}

fn message_properties(timestamp: u64) -> BasicProperties {
    BasicProperties::default()
        .with_delivery_mode(DELIVERY_MODE_PERSISTENT)
        .with_content_type(MESSAGE_CONTENT_TYPE.into())
        .with_timestamp(timestamp)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl EnvelopeSink for Publisher {
    async fn publish(&self, body: Vec<u8>) {
        match self.try_publish(&body).await {
            Ok(()) => info!(
                exchange = EXCHANGE,
                routing_key = %self.inner.routing_key,
                body_length = body.len(),
                "rabbitmq_envelope_published"
            ),
            Err(e) => error!(
                stage = e.stage(),
                exchange = EXCHANGE,
                routing_key = %self.inner.routing_key,
                error = %e,
                "rabbitmq_publish_failed"
            ),
        }
    }
}
