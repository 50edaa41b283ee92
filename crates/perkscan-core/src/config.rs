//! Configuration for the collaborators around the extractor
//!
//! Nothing here is read at import time. The CLI builds these values (reading
//! the environment where it has to) and passes them down explicitly.
//!
//! ## Card catalog resolution
//!
//! The list of pages to scrape is loaded with a three-layer resolution:
//! 1. An explicit path (e.g. `--catalog cards.toml`)
//! 2. The override in the data dir (~/.local/share/perkscan/config/cards.toml)
//! 3. The embedded default (compiled into the binary)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default catalog (compiled into binary)
const DEFAULT_CATALOG: &str = include_str!("../../../config/cards.toml");

/// Environment variable holding the database passphrase
pub const DB_KEY_ENV: &str = "PERKSCAN_DB_KEY";

/// Where extracted records are stored and how to unlock it
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database file holding the rewards and offers collections
    pub collection_target: PathBuf,
    /// Passphrase for SQLCipher encryption; `None` stores unencrypted
    pub credential: Option<String>,
}

impl StoreConfig {
    pub fn new(collection_target: impl Into<PathBuf>, credential: Option<String>) -> Self {
        Self {
            collection_target: collection_target.into(),
            credential,
        }
    }

    /// Unencrypted store (development and tests)
    pub fn unencrypted(collection_target: impl Into<PathBuf>) -> Self {
        Self::new(collection_target, None)
    }

    /// Encrypted store keyed from `PERKSCAN_DB_KEY`
    ///
    /// Fails when the variable is unset, so an encrypted database is never
    /// silently opened without its key.
    pub fn from_env(collection_target: impl Into<PathBuf>) -> Result<Self> {
        match std::env::var(DB_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(Self::new(collection_target, Some(key))),
            _ => Err(Error::Encryption(format!(
                "Database encryption required. Set {} environment variable with your passphrase, \
                or use --no-encrypt for unencrypted databases (not recommended for production).",
                DB_KEY_ENV
            ))),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.credential.is_some()
    }
}

/// HTTP settings for page fetching
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// One marketing page to scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPage {
    /// Card name; selects the extraction profile
    pub name: String,
    pub url: String,
}

/// The set of card pages a scrape run visits, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCatalog {
    #[serde(default)]
    pub cards: Vec<CardPage>,
}

impl CardCatalog {
    /// Resolve the catalog: explicit path, then data-dir override, then embedded default
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        if let Some(default_path) = default_catalog_path() {
            if default_path.exists() {
                return Self::from_file(&default_path);
            }
        }

        debug!("Using embedded card catalog");
        Self::embedded()
    }

    /// The catalog compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CATALOG)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        debug!("Loaded card catalog from {}", path.display());
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let catalog: CardCatalog = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid catalog TOML: {}", e)))?;

        for card in &catalog.cards {
            if card.name.trim().is_empty() {
                return Err(Error::Config("Catalog entry with empty name".to_string()));
            }
            if !card.url.starts_with("http://") && !card.url.starts_with("https://") {
                return Err(Error::Config(format!(
                    "Catalog entry '{}' has a non-HTTP url: {}",
                    card.name, card.url
                )));
            }
        }

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Default catalog override path
pub fn default_catalog_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("perkscan").join("config").join("cards.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_catalog() {
        let catalog = CardCatalog::embedded().unwrap();
        assert_eq!(catalog.len(), 6);
        assert!(catalog
            .cards
            .iter()
            .any(|c| c.name == "CapitalOne Quicksilver Rewards"));
    }

    #[test]
    fn test_parse_catalog() {
        let catalog = CardCatalog::parse(
            r#"
            [[cards]]
            name = "Test Card"
            url = "https://example.com/card"
            "#,
        )
        .unwrap();
        assert_eq!(
            catalog.cards,
            vec![CardPage {
                name: "Test Card".into(),
                url: "https://example.com/card".into(),
            }]
        );
    }

    #[test]
    fn test_parse_empty_catalog() {
        let catalog = CardCatalog::parse("").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_entries() {
        let err = CardCatalog::parse(
            r#"
            [[cards]]
            name = "Local"
            url = "file:///etc/passwd"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        assert!(CardCatalog::parse("[[cards]]\nname = \" \"\nurl = \"https://x\"").is_err());
        assert!(CardCatalog::parse("cards = 3").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[cards]]\nname = \"Chase Freedom Unlimited\"\nurl = \"https://example.com/cfu\""
        )
        .unwrap();

        let catalog = CardCatalog::load(Some(file.path())).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.cards[0].name, "Chase Freedom Unlimited");
    }

    #[test]
    fn test_load_missing_file() {
        let result = CardCatalog::load(Some(Path::new("/nonexistent/cards.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_store_config() {
        let config = StoreConfig::unencrypted("rewards.db");
        assert!(!config.is_encrypted());
        assert_eq!(config.collection_target, PathBuf::from("rewards.db"));

        let config = StoreConfig::new("rewards.db", Some("secret".into()));
        assert!(config.is_encrypted());
    }
}
