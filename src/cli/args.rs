use crate::config::{ServiceConfig, DEFAULT_CHANNEL_CAPACITY, DEFAULT_RESPONDER_NAME};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Run the fruit-stand billing service and its demo client
#[derive(Parser, Debug)]
#[command(name = "billing-engine")]
#[command(about = "Fruit-stand billing service with streaming orders", long_about = None)]
pub struct CliArgs {
    /// Interaction to run against the service
    #[arg(
        long = "mode",
        value_name = "MODE",
        default_value = "demo",
        help = "Interaction: 'demo' runs all four, or one of greet, catalog, batch, interactive"
    )]
    pub mode: DriverMode,

    /// Catalog CSV file (name,price); defaults to the built-in fruit stand
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalog_file: Option<PathBuf>,

    /// Cart CSV file (item,quantity); defaults to the demo cart
    #[arg(long = "cart", value_name = "FILE")]
    pub cart_file: Option<PathBuf>,

    /// Name the storekeeper answers greetings with
    #[arg(long = "responder-name", value_name = "NAME")]
    pub responder_name: Option<String>,

    /// Messages buffered per stream direction
    #[arg(
        long = "channel-capacity",
        value_name = "COUNT",
        help = "Messages buffered per stream direction (default: 16)"
    )]
    pub channel_capacity: Option<usize>,

    /// Runtime worker threads
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Runtime worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Pause between two cart entries sent by the client
    #[arg(long = "send-delay-ms", value_name = "MS", default_value_t = 0)]
    pub send_delay_ms: u64,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

/// Interactions the driver can run
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DriverMode {
    /// The full console session: greeting, stock listing, both orders
    Demo,
    /// Unary greeting only
    Greet,
    /// Server-streaming stock listing only
    Catalog,
    /// Client-streaming order; writes the final bill as CSV
    Batch,
    /// Bidirectional order; writes every bill as CSV
    Interactive,
}

impl CliArgs {
    /// Create a ServiceConfig from CLI arguments
    ///
    /// Missing values take their defaults; invalid ones are replaced by
    /// `ServiceConfig::new` with a warning.
    pub fn to_service_config(&self) -> ServiceConfig {
        if self.responder_name.is_some()
            || self.channel_capacity.is_some()
            || self.worker_threads.is_some()
        {
            let default = ServiceConfig::default();
            ServiceConfig::new(
                self.responder_name
                    .as_deref()
                    .unwrap_or(DEFAULT_RESPONDER_NAME),
                self.channel_capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY),
                self.worker_threads.unwrap_or(default.worker_threads),
            )
        } else {
            ServiceConfig::default()
        }
    }

    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }
}
