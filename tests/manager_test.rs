//! Integration tests for the vault manager
//!
//! Exercises the full publish → download → transfer flow against an
//! on-disk ledger and content store in a temporary data directory.

use gamevault::access::AccessError;
use gamevault::config::GlobalConfig;
use gamevault::manager::{ManagerError, VaultManager};
use gamevault::registry::GameLedger;
use gamevault::storage::content_store::content_locator;
use gamevault::storage::{ContentStore, FsContentStore};
use gamevault::types::AccountAddress;
use std::path::PathBuf;
use tempfile::TempDir;

const ALICE: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const BOB: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

fn address(s: &str) -> AccountAddress {
    s.parse().expect("valid test address")
}

/// Initialize logger for tests
///
/// Safe to call multiple times (subsequent calls are no-ops).
fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

/// Test environment with automatic cleanup
struct TestVaultEnv {
    temp_dir: TempDir,
    config: GlobalConfig,
}

impl TestVaultEnv {
    fn new() -> Self {
        init_test_logger();

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut config = GlobalConfig::default();
        config.data_dir = Some(temp_dir.path().to_string_lossy().to_string());

        Self { temp_dir, config }
    }

    fn manager(&self) -> VaultManager {
        VaultManager::new(&self.config).expect("Failed to open vault")
    }

    fn ledger_path(&self) -> PathBuf {
        self.temp_dir.path().join("ledger.db")
    }

    /// Install a trigger that makes matching ledger writes fail
    fn fail_ledger_writes(&self, trigger: &str) {
        let conn = rusqlite::Connection::open(self.ledger_path())
            .expect("Failed to open ledger database");
        conn.execute_batch(trigger).expect("Failed to install trigger");
    }
}

#[tokio::test]
async fn test_publish_then_download_returns_content() {
    let env = TestVaultEnv::new();
    let mut manager = env.manager();
    let alice = address(ALICE);

    let published = manager
        .publish_game(&alice, "Space Game", "ipfs://space", b"space game build")
        .await
        .expect("Publish should succeed");

    assert_eq!(published.token.token_id, 1);
    assert_eq!(published.content_size, 16);
    assert!(published.token.is_sealed());

    let content = manager
        .download_game(published.token.token_id, &alice)
        .await
        .expect("Owner should download");
    assert_eq!(content, b"space game build");

    let locator = manager.reveal_locator(1, &alice).await.unwrap();
    assert_eq!(locator, content_locator(b"space game build"));
}

#[tokio::test]
async fn test_envelope_does_not_contain_plain_locator() {
    let env = TestVaultEnv::new();
    let mut manager = env.manager();
    let alice = address(ALICE);

    let published = manager
        .publish_game(&alice, "Game", "ipfs://game", b"bytes")
        .await
        .unwrap();

    let envelope = published.token.encrypted_locator.unwrap();
    assert!(!envelope.as_str().contains(&content_locator(b"bytes")));
}

#[tokio::test]
async fn test_non_owner_download_is_denied() {
    let env = TestVaultEnv::new();
    let mut manager = env.manager();
    let alice = address(ALICE);
    let bob = address(BOB);

    manager
        .publish_game(&alice, "Game", "ipfs://game", b"bytes")
        .await
        .unwrap();

    let result = manager.download_game(1, &bob).await;
    assert!(
        matches!(
            result,
            Err(ManagerError::Access(AccessError::AuthenticationFailed))
        ),
        "Expected access denial, got {:?}",
        result
    );
    assert!(!manager.has_access(1, &bob).await.unwrap());
    assert!(manager.has_access(1, &alice).await.unwrap());
}

#[tokio::test]
async fn test_transfer_reseals_for_new_owner() {
    let env = TestVaultEnv::new();
    let mut manager = env.manager();
    let alice = address(ALICE);
    let bob = address(BOB);

    manager
        .publish_game(&alice, "Game", "ipfs://game", b"transferable")
        .await
        .unwrap();

    let record = manager.transfer_game(1, &alice, &bob).await.expect("Transfer should succeed");
    assert_eq!(record.to, bob);

    assert_eq!(manager.download_game(1, &bob).await.unwrap(), b"transferable");
    assert!(matches!(
        manager.download_game(1, &alice).await,
        Err(ManagerError::Access(AccessError::AuthenticationFailed))
    ));

    assert!(manager.owned_games(&alice).unwrap().is_empty());
    assert_eq!(manager.owned_games(&bob).unwrap().len(), 1);
}

#[tokio::test]
async fn test_transfer_by_non_owner_changes_nothing() {
    let env = TestVaultEnv::new();
    let mut manager = env.manager();
    let alice = address(ALICE);
    let bob = address(BOB);

    manager
        .publish_game(&alice, "Game", "ipfs://game", b"bytes")
        .await
        .unwrap();

    let result = manager.transfer_game(1, &bob, &bob).await;
    assert!(matches!(result, Err(ManagerError::SelfTransfer(1))));

    let result = manager.transfer_game(1, &bob, &alice).await;
    assert!(matches!(
        result,
        Err(ManagerError::Access(AccessError::AuthenticationFailed))
    ));

    assert_eq!(manager.ledger().owner_of(1).unwrap(), alice);
    assert_eq!(manager.download_game(1, &alice).await.unwrap(), b"bytes");
}

#[tokio::test]
async fn test_unsealed_token_reports_not_sealed() {
    let mut ledger = GameLedger::in_memory().unwrap();
    let alice = address(ALICE);
    ledger.mint(&alice, "Bare", "ipfs://bare").unwrap();

    let temp_dir = TempDir::new().unwrap();
    let store = FsContentStore::open(temp_dir.path(), true).unwrap();
    let manager = VaultManager::from_parts(ledger, store);

    assert!(matches!(
        manager.download_game(1, &alice).await,
        Err(ManagerError::NotSealed(1))
    ));

    let bob = address(BOB);
    assert!(matches!(
        manager.reveal_locator(1, &bob).await,
        Err(ManagerError::Access(AccessError::AuthenticationFailed))
    ));
    assert!(matches!(
        manager.download_game(1, &bob).await,
        Err(ManagerError::Access(AccessError::AuthenticationFailed))
    ));
}

#[tokio::test]
async fn test_failed_transfer_write_keeps_previous_owner() {
    let env = TestVaultEnv::new();
    let mut manager = env.manager();
    let alice = address(ALICE);
    let bob = address(BOB);

    manager
        .publish_game(&alice, "Game", "ipfs://game", b"kept bytes")
        .await
        .unwrap();

    env.fail_ledger_writes(
        "CREATE TRIGGER fail_seal BEFORE UPDATE OF encrypted_locator ON games
         WHEN NEW.encrypted_locator IS NOT NULL
         BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
    );

    let result = manager.transfer_game(1, &alice, &bob).await;
    assert!(
        matches!(result, Err(ManagerError::Registry(_))),
        "Expected a ledger write failure, got {:?}",
        result
    );

    assert_eq!(manager.ledger().owner_of(1).unwrap(), alice);
    assert!(manager.ledger().token(1).unwrap().is_sealed());
    assert!(manager.ledger().transfer_history(1).unwrap().is_empty());
    assert_eq!(manager.download_game(1, &alice).await.unwrap(), b"kept bytes");
    assert!(matches!(
        manager.download_game(1, &bob).await,
        Err(ManagerError::Access(AccessError::AuthenticationFailed))
    ));
}

#[tokio::test]
async fn test_failed_publish_write_mints_nothing() {
    let env = TestVaultEnv::new();
    let mut manager = env.manager();
    let alice = address(ALICE);

    env.fail_ledger_writes(
        "CREATE TRIGGER fail_mint BEFORE INSERT ON games
         BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
    );

    let result = manager
        .publish_game(&alice, "Game", "ipfs://game", b"bytes")
        .await;
    assert!(matches!(result, Err(ManagerError::Registry(_))));

    assert_eq!(manager.ledger().balance_of(&alice).unwrap(), 0);
    assert!(manager.owned_games(&alice).unwrap().is_empty());
}

#[tokio::test]
async fn test_state_survives_manager_reopen() {
    let env = TestVaultEnv::new();
    let alice = address(ALICE);

    {
        let mut manager = env.manager();
        manager
            .publish_game(&alice, "Persistent", "ipfs://persistent", b"saved")
            .await
            .unwrap();
    }

    let manager = env.manager();
    assert!(manager.store().contains(&content_locator(b"saved")).unwrap());
    assert_eq!(manager.download_game(1, &alice).await.unwrap(), b"saved");
}
