//! apcupsd Exporter CLI
//!
//! Serves the status of an apcupsd-managed UPS as Prometheus metrics.
//! Each scrape of the metrics endpoint polls the NIS once.

use apcupsd_exporter::{
    config::ExporterConfig,
    metrics::{Exporter, MetricStore, MetricsRegistry, MetricsServer, MetricsServerConfig},
    poll::Poller,
    protocol::NisClient,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{error, info};

/// Prometheus exporter for apcupsd.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Colon separated host and port of the Network Information Server to monitor.
    #[arg(long = "nis.address")]
    nis_address: Option<String>,

    /// Timeout in seconds for requests to the Network Information Server.
    #[arg(long = "nis.timeout")]
    nis_timeout: Option<u64>,

    /// Colon separated host and port to listen on for metric requests.
    #[arg(long = "web.listenaddress")]
    web_listen_address: Option<String>,

    /// HTTP endpoint for metrics.
    #[arg(long = "web.endpoint")]
    web_endpoint: Option<String>,

    /// Default log level when RUST_LOG is not set.
    #[arg(long = "log.level", default_value = "info")]
    log_level: tracing::Level,
}

impl Cli {
    fn load_config(&self) -> Result<ExporterConfig, apcupsd_exporter::ConfigError> {
        let mut config = match &self.config {
            Some(path) => ExporterConfig::from_file(path)?,
            None => ExporterConfig::default(),
        };

        if let Some(addr) = &self.nis_address {
            config.nis.address = addr.clone();
        }
        if let Some(timeout) = self.nis_timeout {
            config.nis.timeout_secs = timeout;
        }
        if let Some(listen) = &self.web_listen_address {
            config.web.listen_address = listen.clone();
        }
        if let Some(endpoint) = &self.web_endpoint {
            config.web.endpoint = endpoint.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(cli.log_level.into()),
        )
        .init();

    info!("apcupsd exporter v{}", apcupsd_exporter::VERSION);

    let config = match cli.load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let bind_addr = match config.web.listen_addr() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let registry = match MetricsRegistry::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to create metrics registry: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        nis = %config.nis.address,
        timeout_secs = config.nis.timeout_secs,
        "Polling apcupsd NIS on every scrape"
    );

    let client = NisClient::new(config.nis.address.clone(), config.nis.timeout());
    let poller = Poller::new(client, Arc::new(MetricStore::new()));
    let server = MetricsServer::new(
        MetricsServerConfig {
            bind_addr,
            endpoint: config.web.endpoint.clone(),
        },
        Exporter::new(poller, registry),
    );

    let shutdown = Arc::new(Notify::new());
    let notify = Arc::clone(&shutdown);
    if let Err(e) = ctrlc::set_handler(move || notify.notify_one()) {
        error!("Failed to install Ctrl-C handler: {}", e);
    }

    let signal = async move {
        shutdown.notified().await;
        info!("Shutting down");
    };

    if let Err(e) = server.run(signal).await {
        error!("Metrics server failed: {}", e);
        std::process::exit(1);
    }
}
