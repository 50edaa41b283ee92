//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `extract` - Extraction from saved page text
//! - `records` - Stored rewards/offers listings, catalog and normalization
//! - `scrape` - Scrape and watch commands
//! - `status` - Database status and run history

pub mod core;
pub mod extract;
pub mod records;
pub mod scrape;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use extract::*;
pub use records::*;
pub use scrape::*;
pub use status::*;

use perkscan_core::RewardRecord;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print records in the scrape report layout
pub fn print_records(card_name: &str, records: &[RewardRecord]) {
    if records.is_empty() {
        println!(
            "⚠️  No reward data extracted from {}. Please check the extraction patterns.",
            card_name
        );
        return;
    }

    println!("Rewards extracted from {}:", card_name);
    for record in records {
        println!(" - Card: {}", card_name);
        println!("   Category/Company: {}", record.category);
        println!("   Reward: {}", record.reward);
        match &record.limit {
            Some(limit) => println!("   Spending Limit: ${}", limit),
            None => println!("   Spending Limit: Not specified"),
        }
        println!("   Full text: {}", record.full_text);
        println!("-----");
    }
}
