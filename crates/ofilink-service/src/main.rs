//! ofilinkd - OFILINK 2.0 API server
//!
//! Serves the clients and tickets collections from a JSON data file, plus the
//! AIConta placeholder routes.

use clap::Parser;
use ofilink_service::config::LoggingConfig;
use ofilink_service::{Overrides, Server, ServiceConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ofilinkd", version, about = "OFILINK 2.0 REST API")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "OFILINK_CONFIG")]
    config: Option<String>,

    /// Socket address to bind, e.g. 0.0.0.0:4000
    #[arg(short, long, env = "OFILINK_LISTEN_ADDR")]
    listen: Option<SocketAddr>,

    /// Port to bind; replaces the port of the listen address
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Comma-separated browser origins allowed by CORS
    #[arg(long, env = "CORS_ORIGINS")]
    cors_origins: Option<String>,

    /// JSON data file holding clients and tickets
    #[arg(long, env = "DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "OFILINK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "OFILINK_LOG_JSON")]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            listen: self.listen,
            port: self.port,
            cors_origins: self.cors_origins.clone(),
            data_file: self.data_file.clone(),
            log_level: self.log_level.clone(),
            log_json: self.json,
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.clone().into());

    if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load(cli.config.as_deref())?;
    config.apply(cli.overrides());

    init_tracing(&config.logging);

    Server::new(config)?.run().await?;
    Ok(())
}
