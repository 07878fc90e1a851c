//! Integration tests for configuration loading and overrides

use gamevault::config::{load_config, save_config, ConfigOverrides, GlobalConfig};
use tempfile::TempDir;

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let config = load_config(Some(&path), ConfigOverrides::new()).expect("Load should succeed");
    assert_eq!(config.registry.contract_name, "GameOwnership");
    assert!(config.storage.verify_on_retrieve);
}

#[test]
fn test_saved_config_round_trips_and_cli_overrides_win() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = GlobalConfig::default();
    config.storage.verify_on_retrieve = false;
    config.registry.ledger_path = Some("/from/file/ledger.db".to_string());
    save_config(&config, Some(&path)).expect("Save should succeed");

    let loaded = load_config(Some(&path), ConfigOverrides::new()).unwrap();
    assert!(!loaded.storage.verify_on_retrieve);

    let overrides = ConfigOverrides {
        ledger_path: Some("/from/cli/ledger.db".to_string()),
        ..Default::default()
    };
    let overridden = load_config(Some(&path), overrides).unwrap();
    assert_eq!(
        overridden.registry.ledger_path.as_deref(),
        Some("/from/cli/ledger.db")
    );
}

#[test]
fn test_merge_prefers_other() {
    let base = ConfigOverrides {
        data_dir: Some("/base".to_string()),
        content_dir: Some("/base/content".to_string()),
        ..Default::default()
    };
    let other = ConfigOverrides {
        data_dir: Some("/other".to_string()),
        ..Default::default()
    };

    let merged = base.merge(other);
    assert_eq!(merged.data_dir.as_deref(), Some("/other"));
    assert_eq!(merged.content_dir.as_deref(), Some("/base/content"));
}

#[test]
fn test_empty_contract_name_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut config = GlobalConfig::default();
    config.registry.contract_name = "  ".to_string();
    save_config(&config, Some(&path)).unwrap();

    assert!(load_config(Some(&path), ConfigOverrides::new()).is_err());
}
