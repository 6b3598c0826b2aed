//! `acado-api` entry point.

use std::path::PathBuf;

use acado_api::{ApiConfig, Server};
use clap::Parser;

/// Acado REST API server.
#[derive(Debug, Parser)]
#[command(name = "acado-api", version, about)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "ACADO_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:8080.
    #[arg(long)]
    bind: Option<String>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,

    /// Storage backend: memory or file.
    #[arg(long)]
    storage_backend: Option<String>,

    /// Data directory for the file backend.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut ApiConfig) {
        if let Some(bind) = self.bind {
            config.bind_address = bind;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(backend) = self.storage_backend {
            config.storage.backend = backend;
        }
        if let Some(dir) = self.data_dir {
            config.storage.data_dir = Some(dir);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = ApiConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting acado-api");

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start");
            return Err(e.into());
        }
    };
    server.run().await?;
    Ok(())
}
