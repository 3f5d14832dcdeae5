pub mod api;
pub mod config;
pub mod core_state;
pub mod pipeline;
pub mod render;
pub mod symptoms;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::core_state::CoreState;
use crate::pipeline::GeminiClient;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Signal handler error: {0}")]
    Signal(#[from] std::io::Error),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Load configuration, serve until Ctrl-C, then shut down gracefully.
pub async fn run() -> Result<(), StartupError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    tracing::info!(
        model = %config.analyzer.model,
        max_upload_bytes = config.max_upload_bytes,
        "Configuration loaded"
    );

    let client = Arc::new(GeminiClient::new(&config.analyzer));
    let core = Arc::new(CoreState::new(client, config.max_upload_bytes));

    let mut server = api::start_server(core, config.bind_addr)
        .await
        .map_err(StartupError::Server)?;
    tracing::info!("Open http://{}/ in a browser", server.session.server_addr);

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    server.stopped().await;
    Ok(())
}
