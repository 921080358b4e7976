//! Layered runtime configuration.

use config::{Config, Environment, File};
use derive_getters::Getters;
use derive_setters::Setters;
use rolecall_core::RoleId;
use rolecall_error::{ConfigError, RolecallResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Runtime settings for the bot.
///
/// Sources, later overriding earlier:
/// 1. Built-in defaults
/// 2. `rolecall.toml` (or the file given with `--config`), optional
/// 3. `ROLECALL_*` environment variables, with `.env` loaded first
///
/// ```
/// use rolecall::RolecallConfig;
///
/// let config = RolecallConfig::from_toml(r#"
/// discord_token = "token"
/// database_url = "postgres://localhost/rolecall"
/// moderator_role_id = 42
/// "#).unwrap();
/// assert_eq!(config.command_prefix(), "!");
/// assert_eq!(*config.pool_size(), 10);
/// ```
#[derive(Clone, Deserialize, Serialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct RolecallConfig {
    /// Discord bot token
    #[serde(default)]
    discord_token: String,
    /// PostgreSQL connection string
    #[serde(default)]
    database_url: String,
    /// Maximum pooled database connections
    #[serde(default = "default_pool_size")]
    pool_size: u32,
    /// Prefix for text commands
    #[serde(default = "default_command_prefix")]
    command_prefix: String,
    /// Role that can never be offered and gates the commands
    #[serde(default)]
    moderator_role_id: Option<u64>,
    /// Seconds before a notice is deleted
    #[serde(default = "default_notice_ttl_secs")]
    notice_ttl_secs: u64,
    /// Events buffered per guild before dispatch waits
    #[serde(default = "default_dispatch_queue_capacity")]
    dispatch_queue_capacity: usize,
    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    log_level: String,
    /// Emit JSON log lines
    #[serde(default)]
    json_logs: bool,
}

fn default_pool_size() -> u32 {
    10
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_notice_ttl_secs() -> u64 {
    10
}

fn default_dispatch_queue_capacity() -> usize {
    64
}

fn default_log_level() -> String {
    "info".to_string()
}

impl std::fmt::Debug for RolecallConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RolecallConfig")
            .field("discord_token", &"<redacted>")
            .field("database_url", &"<redacted>")
            .field("pool_size", &self.pool_size)
            .field("command_prefix", &self.command_prefix)
            .field("moderator_role_id", &self.moderator_role_id)
            .field("notice_ttl_secs", &self.notice_ttl_secs)
            .field("dispatch_queue_capacity", &self.dispatch_queue_capacity)
            .field("log_level", &self.log_level)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

impl RolecallConfig {
    /// Load from the optional file at `path` (default `rolecall.toml`) and the
    /// environment.
    #[instrument(skip_all)]
    pub fn load(path: Option<&Path>) -> RolecallResult<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("rolecall").required(false),
        };

        let config: Self = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("ROLECALL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {e}")))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {e}")))?;

        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Parse a TOML document, applying defaults.
    pub fn from_toml(source: &str) -> RolecallResult<Self> {
        Config::builder()
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {e}")).into())
    }

    /// Check the settings the bot cannot start without.
    pub fn validate_for_bot(&self) -> RolecallResult<()> {
        self.validate_for_database()?;
        if self.discord_token.trim().is_empty() {
            return Err(ConfigError::new("discord_token is required").into());
        }
        if self.dispatch_queue_capacity == 0 {
            return Err(ConfigError::new("dispatch_queue_capacity must be positive").into());
        }
        Ok(())
    }

    /// Check the settings database commands need.
    pub fn validate_for_database(&self) -> RolecallResult<()> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::new("database_url is required").into());
        }
        if self.pool_size == 0 {
            return Err(ConfigError::new("pool_size must be positive").into());
        }
        Ok(())
    }

    /// The moderator role as a typed id.
    pub fn moderator_role(&self) -> Option<RoleId> {
        self.moderator_role_id.map(RoleId)
    }

    /// Notice lifetime.
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }
}
