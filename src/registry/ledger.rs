//! SQLite-backed game ownership ledger
//!
//! Local stand-in for the `GameOwnership` contract: mints game tokens,
//! tracks owners, enumerates tokens per owner, transfers ownership, and
//! stores the encrypted storage locator of each token.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{OwnershipRegistry, RegistryError};
use crate::access::EncryptedEnvelope;
use crate::storage::models::{GameToken, TransferRecord};
use crate::types::{AccountAddress, TokenId};

const TOKEN_COLUMNS: &str =
    "token_id, owner, title, metadata_uri, encrypted_locator, minted_at";

/// Game ownership ledger
pub struct GameLedger {
    conn: Connection,
}

impl GameLedger {
    /// Open (or create) a ledger database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        log::info!("Opening ownership ledger: {}", path.display());

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Create a throwaway in-memory ledger
    pub fn in_memory() -> Result<Self, RegistryError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<(), RegistryError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS games (
                token_id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner TEXT NOT NULL,
                title TEXT NOT NULL,
                metadata_uri TEXT NOT NULL,
                encrypted_locator TEXT,
                minted_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_games_owner ON games(owner)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS transfers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                token_id INTEGER NOT NULL REFERENCES games(token_id),
                from_address TEXT NOT NULL,
                to_address TEXT NOT NULL,
                transferred_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_transfers_token ON transfers(token_id)",
            [],
        )?;

        log::debug!("✓ Ledger schema initialized");

        Ok(())
    }

    /// Mint a new game token to `owner` without a locator
    ///
    /// Token ids are assigned sequentially starting at 1.
    pub fn mint(
        &mut self,
        owner: &AccountAddress,
        title: &str,
        metadata_uri: &str,
    ) -> Result<GameToken, RegistryError> {
        self.insert_game(owner, title, metadata_uri, None)
    }

    /// Mint a new game token to `owner` together with its sealed locator
    ///
    /// The row and the envelope are written in one statement: either the
    /// token exists sealed, or it does not exist at all.
    pub fn mint_sealed(
        &mut self,
        owner: &AccountAddress,
        title: &str,
        metadata_uri: &str,
        envelope: &EncryptedEnvelope,
    ) -> Result<GameToken, RegistryError> {
        self.insert_game(owner, title, metadata_uri, Some(envelope))
    }

    fn insert_game(
        &mut self,
        owner: &AccountAddress,
        title: &str,
        metadata_uri: &str,
        envelope: Option<&EncryptedEnvelope>,
    ) -> Result<GameToken, RegistryError> {
        let minted_at = Utc::now();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO games (owner, title, metadata_uri, encrypted_locator, minted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                owner.as_str(),
                title,
                metadata_uri,
                envelope.map(EncryptedEnvelope::as_str),
                minted_at.timestamp()
            ],
        )?;
        let row_id = tx.last_insert_rowid();
        tx.commit()?;

        let token_id = TokenId::try_from(row_id)
            .map_err(|_| RegistryError::InvalidData(format!("negative token id {}", row_id)))?;

        log::info!("Minted game token #{} to {}", token_id, owner);

        self.token(token_id)
    }

    /// Load a token record
    pub fn token(&self, token_id: TokenId) -> Result<GameToken, RegistryError> {
        let query = format!("SELECT {} FROM games WHERE token_id = ?1", TOKEN_COLUMNS);
        self.conn
            .query_row(&query, params![sql_id(token_id)?], token_from_row)
            .optional()?
            .ok_or(RegistryError::TokenNotFound(token_id))
    }

    /// Current owner of a token
    pub fn owner_of(&self, token_id: TokenId) -> Result<AccountAddress, RegistryError> {
        Ok(self.token(token_id)?.owner)
    }

    /// Number of tokens held by `owner`
    pub fn balance_of(&self, owner: &AccountAddress) -> Result<u64, RegistryError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM games WHERE owner = ?1",
            params![owner.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Token id at `index` in `owner`'s holdings (ordered by token id)
    pub fn token_of_owner_by_index(
        &self,
        owner: &AccountAddress,
        index: u64,
    ) -> Result<TokenId, RegistryError> {
        let offset = i64::try_from(index).unwrap_or(i64::MAX);
        let token_id: Option<i64> = self
            .conn
            .query_row(
                "SELECT token_id FROM games WHERE owner = ?1 ORDER BY token_id LIMIT 1 OFFSET ?2",
                params![owner.as_str(), offset],
                |row| row.get(0),
            )
            .optional()?;

        match token_id {
            Some(id) => Ok(id as TokenId),
            None => Err(RegistryError::IndexOutOfBounds {
                owner: owner.clone(),
                index,
                balance: self.balance_of(owner)?,
            }),
        }
    }

    /// All tokens held by `owner`, ordered by token id
    pub fn tokens_of_owner(&self, owner: &AccountAddress) -> Result<Vec<GameToken>, RegistryError> {
        let query = format!(
            "SELECT {} FROM games WHERE owner = ?1 ORDER BY token_id",
            TOKEN_COLUMNS
        );
        let mut stmt = self.conn.prepare(&query)?;
        let tokens = stmt.query_map(params![owner.as_str()], token_from_row)?;

        let result: Result<Vec<_>, _> = tokens.collect();
        Ok(result?)
    }

    /// Transfer a token from `from` to `to`, leaving it unsealed
    ///
    /// `from` must be the current owner. The stored envelope is cleared: it
    /// was sealed for the previous owner and can no longer be opened.
    pub fn transfer(
        &mut self,
        token_id: TokenId,
        from: &AccountAddress,
        to: &AccountAddress,
    ) -> Result<TransferRecord, RegistryError> {
        self.transfer_inner(token_id, from, to, None)
    }

    /// Transfer a token and install the envelope sealed for `to`
    ///
    /// Ownership check, owner change, history row, and envelope are one
    /// transaction, so a failed write leaves the previous owner and the
    /// previous envelope in place.
    pub fn transfer_sealed(
        &mut self,
        token_id: TokenId,
        from: &AccountAddress,
        to: &AccountAddress,
        envelope: &EncryptedEnvelope,
    ) -> Result<TransferRecord, RegistryError> {
        self.transfer_inner(token_id, from, to, Some(envelope))
    }

    fn transfer_inner(
        &mut self,
        token_id: TokenId,
        from: &AccountAddress,
        to: &AccountAddress,
        envelope: Option<&EncryptedEnvelope>,
    ) -> Result<TransferRecord, RegistryError> {
        let id = sql_id(token_id)?;
        let transferred_at = Utc::now();

        let tx = self.conn.transaction()?;

        let owner: Option<String> = tx
            .query_row(
                "SELECT owner FROM games WHERE token_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match owner {
            None => return Err(RegistryError::TokenNotFound(token_id)),
            Some(owner) if owner != from.as_str() => {
                return Err(RegistryError::NotOwner {
                    token_id,
                    address: from.clone(),
                })
            }
            Some(_) => {}
        }

        tx.execute(
            "UPDATE games SET owner = ?1, encrypted_locator = ?2 WHERE token_id = ?3",
            params![to.as_str(), envelope.map(EncryptedEnvelope::as_str), id],
        )?;
        tx.execute(
            "INSERT INTO transfers (token_id, from_address, to_address, transferred_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, from.as_str(), to.as_str(), transferred_at.timestamp()],
        )?;
        tx.commit()?;

        log::info!("Transferred game token #{} from {} to {}", token_id, from, to);

        Ok(TransferRecord {
            token_id,
            from: from.clone(),
            to: to.clone(),
            transferred_at,
        })
    }

    /// Ownership history of a token, oldest first
    pub fn transfer_history(&self, token_id: TokenId) -> Result<Vec<TransferRecord>, RegistryError> {
        let mut stmt = self.conn.prepare(
            "SELECT token_id, from_address, to_address, transferred_at
             FROM transfers WHERE token_id = ?1 ORDER BY id",
        )?;
        let records = stmt.query_map(params![sql_id(token_id)?], |row| {
            Ok(TransferRecord {
                token_id: row.get::<_, i64>(0)? as TokenId,
                from: address_column(row, 1)?,
                to: address_column(row, 2)?,
                transferred_at: timestamp_column(row, 3)?,
            })
        })?;

        let result: Result<Vec<_>, _> = records.collect();
        Ok(result?)
    }
}

impl OwnershipRegistry for GameLedger {
    async fn token_metadata(&self, token_id: TokenId) -> Result<String, RegistryError> {
        Ok(self.token(token_id)?.metadata_uri)
    }

    /// 1 if `address` currently owns the token, 0 otherwise
    async fn ownership_proof(
        &self,
        token_id: TokenId,
        address: &AccountAddress,
    ) -> Result<u64, RegistryError> {
        let owner = self.owner_of(token_id)?;
        Ok(u64::from(&owner == address))
    }
}

fn sql_id(token_id: TokenId) -> Result<i64, RegistryError> {
    i64::try_from(token_id).map_err(|_| RegistryError::TokenNotFound(token_id))
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {}", secs).into(),
        )
    })
}

fn address_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<AccountAddress> {
    row.get::<_, String>(idx)?
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn token_from_row(row: &Row<'_>) -> rusqlite::Result<GameToken> {
    Ok(GameToken {
        token_id: row.get::<_, i64>(0)? as TokenId,
        owner: address_column(row, 1)?,
        title: row.get(2)?,
        metadata_uri: row.get(3)?,
        encrypted_locator: row
            .get::<_, Option<String>>(4)?
            .map(EncryptedEnvelope::from_encoded),
        minted_at: timestamp_column(row, 5)?,
    })
}
