//! HTTP server lifecycle.

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ApiConfig;
use crate::routes::create_router;
use crate::state::AppState;
use crate::Result;

/// A configured, not yet listening, API server.
#[derive(Debug)]
pub struct Server {
    config: ApiConfig,
    router: Router,
}

impl Server {
    /// Validate `config`, open the stores and build the router.
    pub async fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;
        let state = AppState::from_config(&config.storage, &config.auth).await?;
        let router = create_router(state, &config.auth);
        Ok(Self { config, router })
    }

    /// The router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind and serve until SIGINT or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_address).await?;
        tracing::info!(
            address = %self.config.bind_address,
            backend = %self.config.storage.backend,
            auth = self.config.auth.enabled,
            "acado-api listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("acado-api stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received SIGTERM, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
