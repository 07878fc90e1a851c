//! Gamevault
//!
//! NFT-gated game distribution: storage locators are sealed under keys
//! derived from live token ownership, so only the current holder of a
//! game token can find and download the game.

pub mod access;
pub mod cli;
pub mod config;
pub mod manager;
pub mod registry;
pub mod storage;
pub mod types;
