//! Scrape and watch commands

use std::path::Path;

use anyhow::{Context, Result};
use perkscan_core::{
    run_scrape, CardCatalog, Database, FetchConfig, HttpPageSource, PageSource, RewardExtractor,
    ScrapeOptions, ScrapeSummary,
};

use super::print_records;
use crate::scheduler::{run_scheduled_scrapes, ScrapeScheduleConfig};

pub async fn cmd_scrape(db: &Database, catalog: Option<&Path>, keep: bool) -> Result<()> {
    let catalog = CardCatalog::load(catalog).context("Failed to load card catalog")?;
    let source = HttpPageSource::new(&FetchConfig::default())?;
    scrape_with(&source, db, &catalog, keep).await.map(|_| ())
}

/// Run one scrape against any page source and print the report
pub async fn scrape_with<P: PageSource + ?Sized>(
    source: &P,
    db: &Database,
    catalog: &CardCatalog,
    keep: bool,
) -> Result<ScrapeSummary> {
    let extractor = RewardExtractor::new().context("Failed to compile extraction profiles")?;
    let options = ScrapeOptions {
        keep_existing: keep,
    };

    println!("🌐 Scraping {} card pages...", catalog.len());
    let summary = run_scrape(source, &extractor, db, catalog, options)
        .await
        .context("Scrape run failed")?;

    if summary.cleared > 0 {
        println!("   Cleared {} previously stored records", summary.cleared);
    }
    println!();

    let mut rewards = 0;
    let mut offers = 0;
    for outcome in &summary.cards {
        print_records(&outcome.card_name, &outcome.records);
        rewards += outcome.stats.rewards;
        offers += outcome.stats.offers;
        println!();
        println!("Total rewards extracted and inserted so far: {}", rewards);
        println!("Total offers extracted and inserted so far: {}", offers);
        println!();
    }

    println!(
        "✅ Scrape run {} complete: {} rewards, {} offers",
        summary.run_id, summary.totals.rewards, summary.totals.offers
    );
    Ok(summary)
}

pub async fn cmd_watch(
    db: &Database,
    every_hours: Option<u64>,
    catalog: Option<&Path>,
    keep: bool,
) -> Result<()> {
    let catalog = CardCatalog::load(catalog).context("Failed to load card catalog")?;
    let source = HttpPageSource::new(&FetchConfig::default())?;
    let extractor = RewardExtractor::new().context("Failed to compile extraction profiles")?;
    let options = ScrapeOptions {
        keep_existing: keep,
    };

    let Some(config) = ScrapeScheduleConfig::resolve(every_hours) else {
        println!("⏱️  Scheduling disabled, running a single scrape");
        scrape_with(&source, db, &catalog, keep).await?;
        return Ok(());
    };

    println!(
        "⏱️  Scraping {} cards every {} hours (Ctrl-C to stop)",
        catalog.len(),
        config.interval_hours
    );

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
    };
    let runs = run_scheduled_scrapes(
        &source, &extractor, db, &catalog, options, &config, shutdown,
    )
    .await;

    println!();
    println!("👋 Stopped after {} scrape runs", runs);
    Ok(())
}
