//! Discord client setup and lifecycle.

use crate::RolecallHandler;
use rolecall_error::{GatewayError, GatewayErrorKind, GatewayResult};
use serenity::Client;
use serenity::gateway::ShardManager;
use std::sync::Arc;
use tracing::{info, instrument};

/// The connected Discord bot.
///
/// # Example
/// ```no_run
/// use rolecall_social::{RolecallBot, RolecallHandler};
///
/// # async fn demo(handler: RolecallHandler) -> Result<(), Box<dyn std::error::Error>> {
/// let token = std::env::var("DISCORD_TOKEN")?;
/// let mut bot = RolecallBot::new(&token, handler).await?;
/// bot.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct RolecallBot {
    client: Client,
}

impl RolecallBot {
    /// Build the serenity client around `handler`.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the token is malformed or the client fails to
    /// initialize.
    #[instrument(skip(token, handler), fields(token_len = token.len()))]
    pub async fn new(token: &str, handler: RolecallHandler) -> GatewayResult<Self> {
        let intents = RolecallHandler::intents();
        info!(?intents, "Building Discord client");

        let client = Client::builder(token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                GatewayError::new(GatewayErrorKind::Transport(format!(
                    "Failed to build client: {e}"
                )))
            })?;

        Ok(Self { client })
    }

    /// Handle for stopping the bot from another task.
    pub fn shard_manager(&self) -> Arc<ShardManager> {
        self.client.shard_manager.clone()
    }

    /// Connect and process events until the shards shut down.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> GatewayResult<()> {
        info!("Starting Discord bot");
        self.client.start().await.map_err(|e| {
            GatewayError::new(GatewayErrorKind::Transport(format!("Client error: {e}")))
        })
    }
}
