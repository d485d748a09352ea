// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use serial_test::serial;
use tauticord::serve::{load_config, migrate_config, open_database};
use tauticord_config::ConfigPaths;
use tauticord_config::migrations::process_env;
use tauticord_core::TauticordError;
use tauticord_storage::queries::webhooks;

const CURRENT: &str = r#"
Tautulli:
  URL: http://tautulli:8181
  APIKey: key
Discord:
  BotToken: token
  ServerID: 1234
"#;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn current_file_loads_without_migrating() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tauticord.yaml"), CURRENT).unwrap();
    let paths = ConfigPaths::resolve(dir.path());

    migrate_config(&paths, &HashMap::new()).unwrap();
    let config = load_config(&paths).unwrap();
    assert_eq!(config.discord.server_id, 1234);
    assert_eq!(std::fs::read_to_string(&paths.file).unwrap(), CURRENT);
}

#[test]
fn legacy_file_is_migrated_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("tauticord.yaml"),
        "TautulliURL: http://tautulli:8181\nTautulliAPIKey: key\nDiscordBotToken: token\nDiscordServerID: 99\nDiscordChannelName: tauticord\n",
    )
    .unwrap();
    let paths = ConfigPaths::resolve(dir.path());

    migrate_config(&paths, &HashMap::new()).unwrap();
    let config = load_config(&paths).unwrap();
    assert_eq!(config.tautulli.url, "http://tautulli:8181");
    assert_eq!(config.discord.server_id, 99);
    assert_eq!(config.discord.summary_channel_name, "tauticord");
}

#[test]
fn environment_only_boot_writes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ConfigPaths::resolve(dir.path());
    let env = env(&[
        ("TC_TAUTULLI_URL", "http://tautulli:8181"),
        ("TC_TAUTULLI_KEY", "key"),
        ("TC_DISCORD_BOT_TOKEN", "token"),
        ("TC_DISCORD_SERVER_ID", "42"),
    ]);

    migrate_config(&paths, &env).unwrap();
    assert!(paths.file.exists());
    assert_eq!(load_config(&paths).unwrap().discord.server_id, 42);
}

#[test]
fn invalid_configuration_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tauticord.yaml"), "Tautulli:\n  URL: http://x\n").unwrap();
    let paths = ConfigPaths::resolve(dir.path());
    let err = load_config(&paths).unwrap_err();
    assert!(matches!(err, TauticordError::Config(_)));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn database_is_created_with_its_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data/tauticord.db");
    let db = open_database(&path).await.unwrap();
    assert!(path.exists());
    assert_eq!(webhooks::count_webhooks(&db).await.unwrap(), 0);
    db.close().await.unwrap();
}

#[test]
#[serial]
fn process_environment_drives_the_env_migration() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ConfigPaths::resolve(dir.path());
    // SAFETY: serialized with every other test touching the environment.
    unsafe {
        std::env::set_var("TC_TAUTULLI_URL", "http://env-tautulli:8181");
        std::env::set_var("TC_TAUTULLI_KEY", "env-key");
        std::env::set_var("TC_DISCORD_BOT_TOKEN", "env-token");
        std::env::set_var("TC_DISCORD_SERVER_ID", "7");
    }
    let result = migrate_config(&paths, &process_env());
    unsafe {
        for key in ["TC_TAUTULLI_URL", "TC_TAUTULLI_KEY", "TC_DISCORD_BOT_TOKEN", "TC_DISCORD_SERVER_ID"] {
            std::env::remove_var(key);
        }
    }
    result.unwrap();
    assert_eq!(load_config(&paths).unwrap().tautulli.url, "http://env-tautulli:8181");
}
