//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `rewards` - Rewards and offers collections (append, list, clear)
//! - `runs` - Scrape run history

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::{Error, Result};

mod rewards;
mod runs;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Derive an encryption key from a passphrase using Argon2
///
/// Uses a fixed application salt so the same passphrase always produces the same key,
/// regardless of database path.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this would invalidate all existing encrypted databases
    const APP_SALT: &[u8; 16] = b"perkscan-salt-v1";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let hash_str = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(hash_str.as_bytes()))
}

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    db_path: String,
    encrypted: bool,
}

impl Database {
    /// Open (or create) the store described by `config`
    ///
    /// With a credential the database is encrypted using SQLCipher with a key
    /// derived from the passphrase via Argon2.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let path = config.collection_target.to_str().ok_or_else(|| {
            Error::InvalidData(format!(
                "Database path is not valid UTF-8: {}",
                config.collection_target.display()
            ))
        })?;
        Self::new_with_key(path, config.credential.as_deref())
    }

    /// Create a new unencrypted database connection pool
    ///
    /// WARNING: Only use for development or testing.
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Create a new database with an explicit encryption key
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);

        let pool = if let Some(pass) = passphrase {
            let key = derive_key(pass)?;
            let key_pragma = format!("PRAGMA key = 'x\"{}\"';", key);

            // Set the key on every new connection
            let manager = manager.with_init(move |conn| {
                conn.execute_batch(&key_pragma)?;
                Ok(())
            });

            Pool::builder().max_size(4).build(manager)?
        } else {
            Pool::builder().max_size(4).build(manager)?
        };

        let db = Self {
            pool,
            db_path: path.to_string(),
            encrypted: passphrase.is_some(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because SQLCipher
    /// has issues with in-memory databases in the connection pool.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "perkscan_test_{}_{}.db",
            std::process::id(),
            id
        ));

        let _ = std::fs::remove_file(&path);

        Self::new_unencrypted(&path.to_string_lossy())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the scrape run's writes
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Ongoing earn rates
            CREATE TABLE IF NOT EXISTS rewards (
                id INTEGER PRIMARY KEY,
                card_name TEXT NOT NULL,
                reward_type TEXT NOT NULL,
                category TEXT NOT NULL,
                reward TEXT NOT NULL,
                full_text TEXT NOT NULL,
                spending_limit TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_rewards_card ON rewards(card_name);
            CREATE INDEX IF NOT EXISTS idx_rewards_category ON rewards(category);

            -- One-time statement credits
            CREATE TABLE IF NOT EXISTS offers (
                id INTEGER PRIMARY KEY,
                card_name TEXT NOT NULL,
                reward_type TEXT NOT NULL,
                category TEXT NOT NULL,
                offer TEXT NOT NULL,
                full_text TEXT NOT NULL,
                spending_limit TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_offers_card ON offers(card_name);

            -- Scrape run history
            CREATE TABLE IF NOT EXISTS scrape_runs (
                id INTEGER PRIMARY KEY,
                started_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                finished_at DATETIME,
                status TEXT NOT NULL DEFAULT 'running',  -- running, completed, failed
                cards_scraped INTEGER NOT NULL DEFAULT 0,
                rewards_stored INTEGER NOT NULL DEFAULT 0,
                offers_stored INTEGER NOT NULL DEFAULT 0,
                error_message TEXT
            );
            "#,
        )?;

        info!("Database migrations complete");
        Ok(())
    }
}
