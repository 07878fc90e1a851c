//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

use crate::types::{AccountAddress, OutputFormat, TokenId};

#[derive(Parser, Debug)]
#[command(
    name = "gamevault",
    version,
    about = "Gamevault - NFT-gated game distribution vault",
    long_about = None
)]
pub struct Cli {
    /// Custom data directory for the ledger and content store
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Ownership ledger database path (overrides config)
    #[arg(long, global = true)]
    pub ledger_path: Option<String>,

    /// Content store directory (overrides config)
    #[arg(long, global = true)]
    pub content_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize or inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Store a game, mint its ownership token, and seal its locator
    Publish {
        /// Account that receives the minted token
        #[arg(short, long)]
        owner: AccountAddress,

        /// Game file to publish
        #[arg(short, long)]
        file: String,

        /// Display title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,

        /// Public metadata URI (defaults to gamevault://<title>)
        #[arg(short, long)]
        metadata_uri: Option<String>,
    },

    /// Download a game as its current owner
    Download {
        /// Game token id
        #[arg(short, long)]
        token: TokenId,

        /// Requesting account
        #[arg(short, long)]
        requester: AccountAddress,

        /// Where to write the game file
        #[arg(short, long)]
        output: String,
    },

    /// Print the decrypted storage locator of a game
    Locator {
        /// Game token id
        #[arg(short, long)]
        token: TokenId,

        /// Requesting account
        #[arg(short, long)]
        requester: AccountAddress,
    },

    /// Transfer a game to another account
    Transfer {
        /// Game token id
        #[arg(short, long)]
        token: TokenId,

        /// Current owner
        #[arg(short, long)]
        from: AccountAddress,

        /// New owner
        #[arg(long)]
        to: AccountAddress,
    },

    /// List games held by an account
    List {
        /// Owner account
        #[arg(short, long)]
        owner: AccountAddress,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Check whether an account currently holds a game
    Access {
        /// Game token id
        #[arg(short, long)]
        token: TokenId,

        /// Requesting account
        #[arg(short, long)]
        requester: AccountAddress,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize configuration file with defaults
    Init,

    /// Show the effective configuration and resolved paths
    Show,
}
