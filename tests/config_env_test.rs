//! Integration test for environment overrides
//!
//! Kept in its own test binary: it mutates process environment variables
//! that `load_config` reads, which would race with other config tests.

use gamevault::config::{load_config, save_config, ConfigOverrides, GlobalConfig};
use tempfile::TempDir;

const ENV_DATA_DIR: &str = "GAMEVAULT_DATA_DIR";
const ENV_LEDGER_PATH: &str = "GAMEVAULT_LEDGER_PATH";
const ENV_CONTENT_DIR: &str = "GAMEVAULT_CONTENT_DIR";

#[test]
fn test_env_overrides_file_and_cli_overrides_env() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut config = GlobalConfig::default();
    config.data_dir = Some("/from/file".to_string());
    config.registry.ledger_path = Some("/from/file/ledger.db".to_string());
    config.storage.content_dir = Some("/from/file/content".to_string());
    save_config(&config, Some(&path)).expect("Save should succeed");

    std::env::remove_var(ENV_CONTENT_DIR);
    std::env::set_var(ENV_DATA_DIR, "/from/env");
    std::env::set_var(ENV_LEDGER_PATH, "/from/env/ledger.db");

    let cli = ConfigOverrides {
        ledger_path: Some("/from/cli/ledger.db".to_string()),
        ..Default::default()
    };
    let loaded = load_config(Some(&path), cli);

    std::env::remove_var(ENV_DATA_DIR);
    std::env::remove_var(ENV_LEDGER_PATH);

    let loaded = loaded.expect("Load should succeed");
    assert_eq!(loaded.data_dir.as_deref(), Some("/from/env"));
    assert_eq!(
        loaded.registry.ledger_path.as_deref(),
        Some("/from/cli/ledger.db")
    );
    assert_eq!(
        loaded.storage.content_dir.as_deref(),
        Some("/from/file/content")
    );
}
