//! Integration tests against a live PostgreSQL database.
//!
//! These tests require DATABASE_URL to point at a disposable database.
//!
//! Run with: cargo test -p rolecall_database --test postgres_repository_test -- --ignored

use rolecall_core::{
    ConfigChanges, ConfigRepository, EntryField, EntryRepository, GuildId, NewRoleEntry, RoleId,
};
use rolecall_database::{PgConfigRepository, PgEntryRepository, PgPool, establish_pool, run_migrations};

fn pool() -> PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL environment variable must be set for database tests");
    let pool = establish_pool(&url, 2).expect("Failed to build pool");
    run_migrations(&mut pool.get().expect("Failed to get connection"))
        .expect("Failed to run migrations");
    pool
}

fn entry(role: u64, emoji: &str) -> NewRoleEntry {
    NewRoleEntry {
        role_id: RoleId(role),
        emoji: emoji.to_string(),
        name: "Test".to_string(),
        description: "Test role".to_string(),
    }
}

#[tokio::test]
#[ignore]
async fn test_unique_constraints_surface_as_duplicate_key() {
    let repo = PgEntryRepository::new(pool());
    let role = 9_000_000_000_000_000_001;

    let id = repo.insert(&entry(role, "🧪")).await.unwrap();
    let err = repo.insert(&entry(role, "🧫")).await.unwrap_err();
    assert!(err.is_duplicate_key());

    assert!(repo.update_field(id, EntryField::Name, "Renamed").await.unwrap());
    let found = repo.find_by_role(RoleId(role), &[id]).await.unwrap().unwrap();
    assert_eq!(found.name, "Renamed");

    assert!(repo.delete(id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_partial_config_update() {
    let repo = PgConfigRepository::new(pool());
    let guild = GuildId(u64::MAX - 17);

    let config = repo.insert_default(guild).await.unwrap();
    assert!(*config.inline());

    repo.apply(
        guild,
        &ConfigChanges {
            inline: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let again = repo.insert_default(guild).await.unwrap();
    assert!(!*again.inline());
    assert_eq!(again.roles(), config.roles());
}
