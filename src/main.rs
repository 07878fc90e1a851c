//! Gamevault CLI
//!
//! Command-line interface for publishing and downloading NFT-gated games

use clap::Parser;
use gamevault::cli::args::{Cli, Commands, ConfigAction};
use gamevault::cli::commands;
use gamevault::config::ConfigOverrides;
use std::process;

fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Build config overrides from global arguments
    let overrides = ConfigOverrides {
        data_dir: cli.data_dir.clone(),
        ledger_path: cli.ledger_path.clone(),
        content_dir: cli.content_dir.clone(),
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create async runtime: {}", e);
            process::exit(1);
        }
    };

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config::init().map_err(Into::into),
            ConfigAction::Show => commands::config::show(overrides).map_err(Into::into),
        },

        Commands::Publish {
            owner,
            file,
            title,
            metadata_uri,
        } => rt
            .block_on(commands::game::publish(
                &owner,
                &file,
                title.as_deref(),
                metadata_uri.as_deref(),
                &overrides,
            ))
            .map(|_| ())
            .map_err(Into::into),

        Commands::Download {
            token,
            requester,
            output,
        } => rt
            .block_on(commands::game::download(token, &requester, &output, &overrides))
            .map_err(Into::into),

        Commands::Locator { token, requester } => rt
            .block_on(commands::game::locator(token, &requester, &overrides))
            .map(|_| ())
            .map_err(Into::into),

        Commands::Transfer { token, from, to } => rt
            .block_on(commands::game::transfer(token, &from, &to, &overrides))
            .map_err(Into::into),

        Commands::List { owner, format } => {
            commands::game::list(&owner, format, &overrides).map_err(Into::into)
        }

        Commands::Access { token, requester } => {
            match rt.block_on(commands::game::access(token, &requester, &overrides)) {
                Ok(true) => Ok(()),
                Ok(false) => process::exit(2),
                Err(e) => Err(e.into()),
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
