//! Command handlers.

use rolecall::RolecallConfig;
use rolecall_core::{ConfigRepository, EntryRepository};
use rolecall_database::{PgConfigRepository, PgEntryRepository, PgPool, establish_pool, run_migrations};
use rolecall_error::{DatabaseError, RolecallResult};
use rolecall_selector::{
    ConfigRegistry, EntryStore, ReactionDispatcher, ReactionReconciler, SelectorCommands,
    SelectorSettings,
};
use rolecall_social::{RolecallBot, RolecallHandler, SerenityGateway};
use serenity::http::Http;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

fn connect(config: &RolecallConfig) -> RolecallResult<PgPool> {
    config.validate_for_database()?;
    Ok(establish_pool(config.database_url(), *config.pool_size())?)
}

fn apply_migrations(pool: &PgPool) -> RolecallResult<()> {
    let mut conn = pool.get().map_err(DatabaseError::from)?;
    run_migrations(&mut conn)?;
    Ok(())
}

/// Apply pending migrations.
#[instrument(skip_all)]
pub async fn migrate(config: &RolecallConfig) -> RolecallResult<()> {
    let pool = connect(config)?;
    apply_migrations(&pool)?;
    info!("Database is up to date");
    Ok(())
}

/// Hydrate every selector config and report ids without an entry.
///
/// Returns the number of guilds whose selector is damaged.
#[instrument(skip_all)]
pub async fn hydrate_check(config: &RolecallConfig) -> RolecallResult<usize> {
    let pool = connect(config)?;
    let entries: Arc<dyn EntryRepository> = Arc::new(PgEntryRepository::new(pool.clone()));
    let configs: Arc<dyn ConfigRepository> = Arc::new(PgConfigRepository::new(pool));

    let registry = ConfigRegistry::new(configs, entries.clone());
    let loaded = registry.hydrate().await?;
    let store = EntryStore::new(entries);

    let mut damaged = 0;
    for guild_id in registry.guild_ids().await {
        let Some(selector) = registry.snapshot(guild_id).await else {
            continue;
        };
        let found: HashSet<_> = store
            .list_by_ids(selector.roles())
            .await?
            .into_iter()
            .map(|entry| entry.id)
            .collect();
        let missing: Vec<_> = selector
            .roles()
            .iter()
            .filter(|id| !found.contains(*id))
            .collect();

        if missing.is_empty() {
            info!(%guild_id, roles = selector.roles().len(), "Selector consistent");
        } else {
            warn!(%guild_id, ?missing, "Selector references missing entries");
            damaged += 1;
        }
    }

    info!(loaded, damaged, total_entries = store.count().await?, "Hydration check finished");
    Ok(damaged)
}

/// Connect to Discord and serve until Ctrl+C.
#[instrument(skip_all)]
pub async fn run_bot(config: &RolecallConfig, migrate_first: bool) -> RolecallResult<()> {
    config.validate_for_bot()?;
    let pool = connect(config)?;
    if migrate_first {
        apply_migrations(&pool)?;
    }

    let entry_repository: Arc<dyn EntryRepository> =
        Arc::new(PgEntryRepository::new(pool.clone()));
    let config_repository: Arc<dyn ConfigRepository> = Arc::new(PgConfigRepository::new(pool));

    let registry = Arc::new(ConfigRegistry::new(
        config_repository,
        entry_repository.clone(),
    ));
    registry.hydrate().await?;

    let gateway = Arc::new(SerenityGateway::new(Arc::new(Http::new(
        config.discord_token(),
    ))));
    let entries = EntryStore::new(entry_repository);
    let settings = SelectorSettings::default()
        .with_moderator_role_id(config.moderator_role())
        .with_notice_ttl(config.notice_ttl());

    let reconciler = Arc::new(ReactionReconciler::new(
        registry.clone(),
        entries.clone(),
        gateway.clone(),
        config.notice_ttl(),
    ));
    let dispatcher = Arc::new(ReactionDispatcher::new(
        reconciler,
        *config.dispatch_queue_capacity(),
    ));
    let commands = Arc::new(SelectorCommands::new(registry, entries, gateway, settings));

    let handler = RolecallHandler::new(commands, dispatcher.clone(), config.command_prefix());
    let mut bot = RolecallBot::new(config.discord_token(), handler).await?;

    let shard_manager = bot.shard_manager();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => error!(error = %e, "Could not listen for Ctrl+C"),
        }
        shard_manager.shutdown_all().await;
    });

    bot.start().await?;
    dispatcher.shutdown().await;
    info!("Rolecall stopped");
    Ok(())
}
