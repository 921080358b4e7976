//! Logging setup.

use derive_getters::Getters;
use derive_setters::Setters;
use rolecall_error::{ConfigError, RolecallResult};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// How the binary writes logs.
#[derive(Debug, Clone, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is unset (e.g. "info", "rolecall_selector=debug")
    log_level: String,
    /// Force debug level regardless of `RUST_LOG`
    verbose: bool,
    /// Emit JSON lines instead of human-readable text
    json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            verbose: false,
            json_logs: false,
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level unless `verbose` is set.
pub fn init_observability(config: &ObservabilityConfig) -> RolecallResult<()> {
    let env_filter = if config.verbose {
        Ok(EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))
    }
    .map_err(|e| ConfigError::new(format!("Invalid log filter: {e}")))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install subscriber: {e}")))?;

    Ok(())
}
