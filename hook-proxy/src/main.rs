//! Hook Proxy - deploy webhook receiver.
//!
//! This binary:
//! - Receives deploy webhooks on every path (`/deploy/<hash>`)
//! - Wraps the body in a `hosting`/`webhooks_handle` envelope
//! - Publishes the envelope to the `logs` exchange on RabbitMQ
//! - Returns 200 to the sender regardless of the publish outcome

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hookproxy::web::{router, serve};
use hookproxy::{AppState, Args, Config, Publisher};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    let args = Args::parse();

    info!("web_server_starting");

    let config = Config::from_file(&args.config).context("Failed to load config")?;
    let routing_key = args.routing_key(&config.amqp);
    info!(
        broker = %config.amqp.redacted_uri(),
        exchange = %config.amqp.exchange,
        consumer_tag = %config.amqp.consumer_tag,
        routing_key = %routing_key,
        port = args.port,
        tls = args.use_tls(),
        "config_loaded"
    );

    let publisher = Publisher::new(config.amqp.uri(), routing_key);
    let app = router(AppState::new(publisher));

    serve(app, &args).await?;

    info!("web_server_shutdown_complete");

    Ok(())
}
