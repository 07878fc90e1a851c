//! Shared types for gamevault
//!
//! Common data structures used across the vault implementation.

use serde::{Deserialize, Serialize};

/// Game token identifier (ERC-721 token id)
pub type TokenId = u64;

/// Account address (`0x` + 40 hex digits)
///
/// Parsed case-insensitively and stored lowercase, so an EIP-55
/// checksummed spelling and its lowercase form are the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

/// Address parse errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address must start with 0x: {0}")]
    MissingPrefix(String),

    #[error("Address must have 40 hex digits, got {1}: {0}")]
    InvalidLength(String, usize),

    #[error("Address contains non-hex characters: {0}")]
    InvalidHex(String),
}

impl AccountAddress {
    /// Normalized (lowercase) address string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::str::FromStr for AccountAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;

        if digits.len() != 40 {
            return Err(AddressError::InvalidLength(s.to_string(), digits.len()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError::InvalidHex(s.to_string()));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.0
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output format for game listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format (default)
    Table,

    /// JSON format for machine parsing
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid output format '{}'. Valid options: table, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_normalizes_case() {
        let upper: AccountAddress = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01".parse().unwrap();
        let lower: AccountAddress = "0xabcdef0123456789abcdef0123456789abcdef01".parse().unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!(matches!(
            "abcdef0123456789abcdef0123456789abcdef01".parse::<AccountAddress>(),
            Err(AddressError::MissingPrefix(_))
        ));
        assert!(matches!(
            "0xabcd".parse::<AccountAddress>(),
            Err(AddressError::InvalidLength(_, 4))
        ));
        assert!(matches!(
            "0xzzcdef0123456789abcdef0123456789abcdef01".parse::<AccountAddress>(),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("compact".parse::<OutputFormat>().is_err());
    }
}
