//! Stored record listings, catalog and category commands

use std::path::Path;

use anyhow::{Context, Result};
use perkscan_core::{normalize, CardCatalog, Database, RewardExtractor, StoredReward};

use super::truncate;

pub fn cmd_rewards(db: &Database, card: Option<&str>, json: bool) -> Result<()> {
    let rewards = db.list_rewards(card)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rewards)?);
        return Ok(());
    }

    println!();
    println!("🎁 Rewards ({})", rewards.len());
    print_stored(&rewards, card);
    Ok(())
}

pub fn cmd_offers(db: &Database, card: Option<&str>, json: bool) -> Result<()> {
    let offers = db.list_offers(card)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&offers)?);
        return Ok(());
    }

    println!();
    println!("💳 Offers ({})", offers.len());
    print_stored(&offers, card);
    Ok(())
}

fn print_stored(records: &[StoredReward], card: Option<&str>) {
    println!("   ─────────────────────────────────────────────────────────────");

    if records.is_empty() {
        match card {
            Some(card) => println!("   No records stored for '{}'.", card),
            None => println!("   No records stored yet. Run 'perkscan scrape' first."),
        }
        println!();
        return;
    }

    let mut current_card: Option<&str> = None;
    for record in records {
        if current_card != Some(record.card_name.as_str()) {
            println!();
            println!("   {}", record.card_name);
            current_card = Some(record.card_name.as_str());
        }

        let limit = record
            .limit
            .as_deref()
            .map(|l| format!(" (up to ${})", l))
            .unwrap_or_default();
        println!(
            "   {:>6}  {:<10} {:<30} {}{}",
            record.id,
            record.reward,
            record.category.as_str(),
            record.reward_type,
            limit
        );
        println!("           {}", truncate(&record.full_text, 70));
    }
    println!();
}

pub fn cmd_cards(catalog: Option<&Path>) -> Result<()> {
    let catalog = CardCatalog::load(catalog).context("Failed to load card catalog")?;
    let extractor = RewardExtractor::new().context("Failed to compile extraction profiles")?;

    println!();
    println!("🗂️  Card Catalog ({} cards)", catalog.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for card in &catalog.cards {
        let profile = extractor.profile_for(&card.name);
        println!(
            "   {:<36} profile: {} ({} rules)",
            card.name,
            profile.name,
            profile.rules().len()
        );
        println!("      {}", card.url);
    }

    println!();
    Ok(())
}

pub fn cmd_normalize(text: &str) -> Result<()> {
    println!("{}", normalize(text));
    Ok(())
}
