//! Scrape runs over the card catalog
//!
//! A run visits every catalog page in order, extracts its rewards with the
//! card's profile and routes the records into the rewards and offers
//! collections. Each run is recorded in the run history.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::CardCatalog;
use crate::db::Database;
use crate::error::Result;
use crate::extract::RewardExtractor;
use crate::fetch::PageSource;
use crate::models::{DispatchStats, RewardRecord};
use crate::sink::dispatch;

/// Options for a scrape run
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrapeOptions {
    /// Keep previously stored rewards and offers instead of clearing them
    pub keep_existing: bool,
}

/// What one catalog page produced
#[derive(Debug, Clone, Serialize)]
pub struct CardOutcome {
    pub card_name: String,
    pub url: String,
    pub records: Vec<RewardRecord>,
    pub stats: DispatchStats,
}

/// Result of a completed scrape run
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeSummary {
    pub run_id: i64,
    pub cleared: usize,
    pub cards: Vec<CardOutcome>,
    pub totals: DispatchStats,
}

/// Run one scrape pass over `catalog`
///
/// Stops at the first fetch or store error; the run is then recorded as
/// failed and the error is returned.
pub async fn run_scrape<P: PageSource + ?Sized>(
    source: &P,
    extractor: &RewardExtractor,
    db: &Database,
    catalog: &CardCatalog,
    options: ScrapeOptions,
) -> Result<ScrapeSummary> {
    let run_id = db.start_scrape_run()?;
    info!("Starting scrape run {} over {} cards", run_id, catalog.len());

    match scrape_catalog(source, extractor, db, catalog, options, run_id).await {
        Ok(summary) => {
            db.complete_scrape_run(run_id, summary.cards.len(), &summary.totals)?;
            info!(
                "Scrape run {} complete: {} rewards, {} offers",
                run_id, summary.totals.rewards, summary.totals.offers
            );
            Ok(summary)
        }
        Err(e) => {
            warn!("Scrape run {} failed: {}", run_id, e);
            if let Err(update) = db.fail_scrape_run(run_id, &e.to_string()) {
                warn!("Failed to record failure of scrape run {}: {}", run_id, update);
            }
            Err(e)
        }
    }
}

async fn scrape_catalog<P: PageSource + ?Sized>(
    source: &P,
    extractor: &RewardExtractor,
    db: &Database,
    catalog: &CardCatalog,
    options: ScrapeOptions,
    run_id: i64,
) -> Result<ScrapeSummary> {
    let cleared = if options.keep_existing {
        0
    } else {
        let cleared = db.clear_collections()?;
        info!("Cleared {} previously stored records", cleared);
        cleared
    };

    let mut summary = ScrapeSummary {
        run_id,
        cleared,
        cards: Vec::with_capacity(catalog.len()),
        totals: DispatchStats::default(),
    };

    for card in &catalog.cards {
        info!("Scraping {}: {}", card.name, card.url);
        let text = source.fetch_text(&card.url).await?;

        let records = extractor.extract(&text, &card.name);
        if records.is_empty() {
            warn!(
                "No reward data extracted from {}; the page layout may have changed",
                card.name
            );
        }

        let stats = dispatch(db, &card.name, &records)?;
        summary.totals += stats;
        info!(
            "Totals so far: {} rewards, {} offers",
            summary.totals.rewards, summary.totals.offers
        );

        summary.cards.push(CardOutcome {
            card_name: card.name.clone(),
            url: card.url.clone(),
            records,
            stats,
        });
    }

    Ok(summary)
}
