//! Extraction from saved page text

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use perkscan_core::{dispatch, Database, RewardExtractor, RewardRecord};

use super::print_records;

/// Read page text from a file, or stdin when no file is given
pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read page text from stdin")?;
            Ok(text)
        }
    }
}

/// Extract records for `card_name`, print them and optionally store them
pub fn cmd_extract(
    db: Option<&Database>,
    card_name: &str,
    text: &str,
    json: bool,
) -> Result<Vec<RewardRecord>> {
    let extractor = RewardExtractor::new().context("Failed to compile extraction profiles")?;
    let records = extractor.extract(text, card_name);

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_records(card_name, &records);
    }

    if let Some(db) = db {
        let stats = dispatch(db, card_name, &records).context("Failed to store records")?;
        if !json {
            println!();
            println!(
                "💾 Stored {} rewards and {} offers",
                stats.rewards, stats.offers
            );
        }
    }

    Ok(records)
}
