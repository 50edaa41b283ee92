//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use perkscan_core::{Database, StoreConfig};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    if no_encrypt {
        Database::open(&StoreConfig::unencrypted(db_path))
            .context("Failed to open database (unencrypted)")
    } else {
        let config = StoreConfig::from_env(db_path)?;
        Database::open(&config).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    println!(
        "   Rewards: {}, Offers: {}",
        db.count_rewards()?,
        db.count_offers()?
    );

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Scrape card pages: perkscan scrape");
    println!("  2. Review results: perkscan rewards");

    Ok(())
}
