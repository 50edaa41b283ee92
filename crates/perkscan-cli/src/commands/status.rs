//! Status command: database, collections and scrape run history

use std::path::Path;

use anyhow::Result;
use perkscan_core::{RunStatus, DB_KEY_ENV};

use super::open_db;

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Perkscan Status");
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
        println!();
        return Ok(());
    }

    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    let db = match open_db(db_path, no_encrypt) {
        Ok(db) => db,
        Err(e) => {
            println!();
            println!("   ❌ Error opening database: {}", e);
            if !no_encrypt && !has_key {
                println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
            } else if has_key {
                println!("      (Check if {} is correct)", DB_KEY_ENV);
            }
            println!();
            return Ok(());
        }
    };

    println!();
    println!("   Rewards: {}", db.count_rewards()?);
    println!("   Offers: {}", db.count_offers()?);

    let cards = db.stored_cards()?;
    if !cards.is_empty() {
        println!("   Cards: {}", cards.join(", "));
    }

    let runs = db.list_scrape_runs(5)?;
    println!();
    if runs.is_empty() {
        println!("   No scrape runs yet.");
    } else {
        println!("   Recent scrape runs:");
        for run in runs {
            let icon = match run.status {
                RunStatus::Completed => "✅",
                RunStatus::Failed => "❌",
                RunStatus::Running => "⏳",
            };
            println!(
                "   {} #{} {}  {} cards, {} rewards, {} offers",
                icon,
                run.id,
                run.started_at.format("%Y-%m-%d %H:%M"),
                run.cards_scraped,
                run.rewards_stored,
                run.offers_stored
            );
            if let Some(message) = run.error_message {
                println!("      {}", message);
            }
        }
    }

    println!();
    Ok(())
}
