//! Game CLI Commands
//!
//! Command implementations for publishing, downloading, transferring,
//! and listing game ownership tokens.

use std::path::Path;

use crate::config::{load_config, ConfigOverrides};
use crate::manager::{ManagerError, VaultManager};
use crate::storage::file_system::{read_game_file, write_game_file, FileSystemError};
use crate::storage::models::GameToken;
use crate::types::{AccountAddress, OutputFormat, TokenId};

/// Error type for game command operations
#[derive(Debug, thiserror::Error)]
pub enum GameCommandError {
    #[error("Manager error: {0}")]
    Manager(#[from] ManagerError),

    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("File system error: {0}")]
    FileSystem(#[from] FileSystemError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn open_manager(overrides: &ConfigOverrides) -> Result<VaultManager, GameCommandError> {
    let config = load_config(None, overrides.clone())?;
    Ok(VaultManager::new(&config)?)
}

/// Publish a game file
///
/// # Arguments
///
/// * `owner` - Account receiving the minted token
/// * `file` - Path to the game file
/// * `title` - Optional title (defaults to the file name)
/// * `metadata_uri` - Optional metadata URI (defaults to `gamevault://<title>`)
/// * `overrides` - Config overrides from CLI/env
pub async fn publish(
    owner: &AccountAddress,
    file: &str,
    title: Option<&str>,
    metadata_uri: Option<&str>,
    overrides: &ConfigOverrides,
) -> Result<GameToken, GameCommandError> {
    let path = Path::new(file);
    let content = read_game_file(path)?;

    let title = match title {
        Some(t) => t.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.to_string()),
    };
    let metadata_uri = match metadata_uri {
        Some(uri) => uri.to_string(),
        None => format!("gamevault://{}", title),
    };

    let mut manager = open_manager(overrides)?;
    let published = manager
        .publish_game(owner, &title, &metadata_uri, &content)
        .await?;

    println!("✓ Game published");
    println!();
    println!("  Token ID:     {}", published.token.token_id);
    println!("  Title:        {}", published.token.title);
    println!("  Owner:        {}", published.token.owner);
    println!("  Metadata URI: {}", published.token.metadata_uri);
    println!("  Size:         {} bytes", published.content_size);

    Ok(published.token)
}

/// Download a game to `output`
pub async fn download(
    token_id: TokenId,
    requester: &AccountAddress,
    output: &str,
    overrides: &ConfigOverrides,
) -> Result<(), GameCommandError> {
    let manager = open_manager(overrides)?;
    let content = manager.download_game(token_id, requester).await?;

    write_game_file(Path::new(output), &content)?;

    println!("✓ Downloaded token #{} to {}", token_id, output);
    println!("  Size: {} bytes", content.len());

    Ok(())
}

/// Print the decrypted storage locator
pub async fn locator(
    token_id: TokenId,
    requester: &AccountAddress,
    overrides: &ConfigOverrides,
) -> Result<String, GameCommandError> {
    let manager = open_manager(overrides)?;
    let locator = manager.reveal_locator(token_id, requester).await?;

    println!("{}", locator);

    Ok(locator)
}

/// Transfer a game to a new owner
pub async fn transfer(
    token_id: TokenId,
    from: &AccountAddress,
    to: &AccountAddress,
    overrides: &ConfigOverrides,
) -> Result<(), GameCommandError> {
    let mut manager = open_manager(overrides)?;
    let record = manager.transfer_game(token_id, from, to).await?;

    println!("✓ Token #{} transferred", record.token_id);
    println!("  From: {}", record.from);
    println!("  To:   {}", record.to);

    Ok(())
}

/// List games held by `owner`
pub fn list(
    owner: &AccountAddress,
    format: OutputFormat,
    overrides: &ConfigOverrides,
) -> Result<(), GameCommandError> {
    let manager = open_manager(overrides)?;
    let games = manager.owned_games(owner)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&games)?);
        }
        OutputFormat::Table => {
            if games.is_empty() {
                println!("No games found for {}.", owner);
                return Ok(());
            }

            println!("Games owned by {} ({}):", owner, games.len());
            println!();
            for game in games {
                println!("  #{} {}", game.token_id, game.title);
                println!("    Metadata: {}", game.metadata_uri);
                println!("    Minted:   {}", game.minted_at.format("%Y-%m-%d %H:%M:%S"));
                println!("    Sealed:   {}", if game.is_sealed() { "yes" } else { "no" });
                println!();
            }
        }
    }

    Ok(())
}

/// Check whether `requester` currently holds `token_id`
pub async fn access(
    token_id: TokenId,
    requester: &AccountAddress,
    overrides: &ConfigOverrides,
) -> Result<bool, GameCommandError> {
    let manager = open_manager(overrides)?;
    let allowed = manager.has_access(token_id, requester).await?;

    if allowed {
        println!("✓ {} holds token #{}", requester, token_id);
    } else {
        println!("✗ {} does not hold token #{}", requester, token_id);
    }

    Ok(allowed)
}
