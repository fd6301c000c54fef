//! Structured logging setup

use tracing_subscriber::{fmt::MakeWriter, util::SubscriberInitExt, EnvFilter};

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Initialize JSON tracing output filtered by `service.log_level`
///
/// `RUST_LOG` style directives are accepted, e.g. `info,console_service=debug`.
pub fn init_tracing(config: &Config) -> Result<()> {
    json_subscriber(level_filter(&config.service.log_level), std::io::stdout)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize tracing: {}", e)))?;

    tracing::info!(
        service = %config.service.name,
        environment = %config.service.environment,
        "Tracing initialized"
    );

    Ok(())
}

/// Shutdown tracing
pub fn shutdown_tracing() {
    tracing::info!("Tracing shutdown complete");
}

fn json_subscriber<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish()
}

// An unparseable level falls back to info
fn level_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}
