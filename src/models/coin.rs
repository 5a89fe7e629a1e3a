//! Coin Metadata Model
//!
//! Identity of a coin as seen by the eligibility filter, plus loading of
//! coin lists saved as JSON (either a bare array or a `{ "data": [...] }`
//! container as written by the market-cap fetch job).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};

/// Coin identity: ticker-based id, display name and symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinMetadata {
    /// Lower-case ticker used as the canonical identifier (e.g., "eth")
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

impl CoinMetadata {
    pub fn new(id: &str, name: &str, symbol: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }

    /// Metadata for a coin known only by its cached id
    pub fn from_id(id: &str) -> Self {
        Self::new(id, "", &id.to_uppercase())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoinListFile {
    Container { data: Vec<CoinMetadata> },
    Bare(Vec<CoinMetadata>),
}

/// Load coin metadata from a JSON file
pub fn load_coin_list<P: AsRef<Path>>(file_path: P) -> Result<Vec<CoinMetadata>> {
    let path = file_path.as_ref();
    if !path.exists() {
        return Err(AppError::NotFound(format!("Coin list {}", path.display())));
    }
    let contents = fs::read_to_string(path)?;
    parse_coin_list(&contents)
}

/// Parse coin metadata from JSON text
pub fn parse_coin_list(contents: &str) -> Result<Vec<CoinMetadata>> {
    let file: CoinListFile = serde_json::from_str(contents)?;
    Ok(match file {
        CoinListFile::Container { data } => data,
        CoinListFile::Bare(data) => data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let coins = parse_coin_list(r#"[{"id":"eth","name":"Ethereum","symbol":"ETH"}]"#).unwrap();
        assert_eq!(coins, vec![CoinMetadata::new("eth", "Ethereum", "ETH")]);
    }

    #[test]
    fn test_parse_container() {
        let json = r#"{"fetched_at":"2025-01-01","data":[{"id":"sol","symbol":"SOL"}]}"#;
        let coins = parse_coin_list(json).unwrap();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].id, "sol");
        assert_eq!(coins[0].name, "");
    }

    #[test]
    fn test_from_id_uppercases_symbol() {
        let coin = CoinMetadata::from_id("link");
        assert_eq!(coin.symbol, "LINK");
    }
}
