//! Tests for layered configuration loading.

use rolecall::RolecallConfig;
use std::io::Write;

#[test]
fn test_load_from_explicit_file() {
    let dir = std::env::temp_dir().join(format!("rolecall-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bot.toml");

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
discord_token = "file-token"
database_url = "postgres://localhost/rolecall"
command_prefix = "?"
moderator_role_id = 1234
notice_ttl_secs = 30
"#
    )
    .unwrap();

    let config = RolecallConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.command_prefix(), "?");
    assert_eq!(config.moderator_role().map(|r| r.get()), Some(1234));
    assert_eq!(config.notice_ttl().as_secs(), 30);
    assert_eq!(*config.pool_size(), 10);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let path = std::env::temp_dir().join("rolecall-does-not-exist.toml");
    assert!(RolecallConfig::load(Some(path.as_path())).is_err());
}

#[test]
fn test_sample_config_parses() {
    let sample = include_str!("../../../rolecall.toml.example");
    let parsed: toml::Value = toml::from_str(sample).unwrap();
    assert!(parsed.get("command_prefix").is_some());

    let config = RolecallConfig::from_toml(sample).unwrap();
    assert_eq!(*config.dispatch_queue_capacity(), 64);
}
