//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::config::AmqpConfig;

/// Port on which the server listens with TLS.
pub const TLS_PORT: u16 = 443;

#[derive(Debug, Clone, Parser)]
#[command(name = "hook-proxy")]
#[command(about = "Forward deploy webhooks to RabbitMQ", long_about = None)]
pub struct Args {
    /// Listen port
    #[arg(long, default_value_t = TLS_PORT)]
    pub port: u16,

    /// Certificate path
    #[arg(long, default_value = "/etc/pki/tls/certs/hostinger.crt")]
    pub cert: PathBuf,

    /// Private key path
    #[arg(long, default_value = "/etc/pki/tls/private/hostinger.key")]
    pub key: PathBuf,

    /// AMQP routing key to proxy requests to (defaults to `amqp.queue`)
    #[arg(long)]
    pub queue: Option<String>,

    /// API config file
    #[arg(long)]
    pub config: PathBuf,
}

impl Args {
    pub fn use_tls(&self) -> bool {
        self.port == TLS_PORT
    }

    /// The `--queue` flag wins over the config file when it is non-empty.
    pub fn routing_key(&self, amqp: &AmqpConfig) -> String {
        match self.queue.as_deref() {
            Some(queue) if !queue.is_empty() => queue.to_string(),
            _ => amqp.queue.clone(),
        }
    }
}
