use anyhow::{Context, Result};
use delivopt::config::{load_config, LoggingSettings};
use delivopt::{start_server, ServerConfig, SolverFactory};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = load_config().context("Failed to load configuration")?;

    setup_tracing(&settings.logging)?;

    let address = settings
        .server
        .address
        .parse::<SocketAddr>()
        .with_context(|| format!("Invalid server address '{}'", settings.server.address))?;

    info!("Starting delivopt server");

    let factory = SolverFactory::from_settings(settings);
    let config = ServerConfig::new(address, factory);
    start_server(config)
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}

fn setup_tracing(logging: &LoggingSettings) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid log level")?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("Failed to initialize tracing")?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to initialize tracing")?;
    }

    Ok(())
}
