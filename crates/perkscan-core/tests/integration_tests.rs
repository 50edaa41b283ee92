//! Integration tests for perkscan-core
//!
//! These tests exercise the full fetch → extract → route → store workflow.

use std::collections::HashMap;

use async_trait::async_trait;
use perkscan_core::{
    db::Database,
    dispatch,
    extract::{profiles, RewardExtractor},
    html_to_text, run_scrape, CardCatalog, CardPage, Category, Error, PageSource, Result,
    RewardType, RunStatus, ScrapeOptions, Sink,
};

/// AMEX-style page: several cash back tiers, a welcome offer and a statement credit
fn amex_page() -> &'static str {
    r#"<html>
  <head>
    <title>Blue Cash Preferred</title>
    <script>window.dataLayer = [{"offer": "9% CASH BACK On everything"}];</script>
  </head>
  <body>
    <div class="offer">Earn a <b>$250</b> statement credit after you spend $3,000 in purchases</div>
    <ul>
      <li><span>6%</span> CASH BACK On U.S. grocery stores¤</li>
      <li><span>6%</span> CASH BACK On select U.S. streaming subscriptions‡</li>
      <li><span>3%</span> CASH BACK On transit including taxis and rideshare</li>
      <li><span>3%</span> CASH BACK On U.S. gas stations</li>
    </ul>
  </body>
</html>"#
}

fn quicksilver_page() -> &'static str {
    r#"<html><body>
  <h1>Quicksilver</h1>
  <p>Earn unlimited 1.5% cash back on every purchase, every day</p>
  <p>Earn unlimited 1.5% cash back on every purchase.</p>
</body></html>"#
}

/// Serves canned HTML keyed by url, flattened like the HTTP source does
struct FixturePages(HashMap<&'static str, &'static str>);

#[async_trait]
impl PageSource for FixturePages {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.0
            .get(url)
            .map(|html| html_to_text(html))
            .ok_or_else(|| Error::Fetch(format!("{} returned HTTP 404", url)))
    }
}

// =============================================================================
// Extraction Pipeline Tests
// =============================================================================

#[test]
fn test_amex_page_pipeline() {
    let extractor = RewardExtractor::new().expect("Failed to compile profiles");
    let text = html_to_text(amex_page());
    assert!(!text.contains("9% CASH BACK"), "script text must be skipped");

    let records = extractor.extract(&text, "AMEX Blue Cash Preferred Card");
    let cashback: Vec<_> = records
        .iter()
        .filter(|r| r.reward_type == RewardType::Cashback)
        .map(|r| (r.reward.as_str(), r.category))
        .collect();
    assert_eq!(
        cashback,
        vec![
            ("6%", Category::Groceries),
            ("6%", Category::Streaming),
            ("3%", Category::Transit),
            ("3%", Category::Gas),
        ]
    );

    let credits: Vec<_> = records
        .iter()
        .filter(|r| r.reward_type == RewardType::Credit)
        .collect();
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].reward, "$250 statement credit");
}

#[test]
fn test_quicksilver_dedup_across_page() {
    let extractor = RewardExtractor::new().unwrap();
    let text = html_to_text(quicksilver_page());
    let records = extractor.extract(&text, profiles::CAPITAL_ONE_QUICKSILVER);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reward, "1.5%");
    assert_eq!(records[0].category, Category::OtherPurchases);
}

// =============================================================================
// Storage Integration Tests
// =============================================================================

#[test]
fn test_extract_and_store() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let extractor = RewardExtractor::new().unwrap();

    let records = extractor.extract(&html_to_text(amex_page()), "AMEX Blue Cash Preferred Card");
    let stats = dispatch(&db, "AMEX Blue Cash Preferred Card", &records).unwrap();
    assert_eq!(stats.offers, 1);
    assert_eq!(stats.rewards, records.len() - 1);

    let offers = db.list_offers(Some("AMEX Blue Cash Preferred Card")).unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].sink, Sink::Offers);
    assert_eq!(offers[0].reward, "$250 statement credit");

    let rewards = db.list_rewards(None).unwrap();
    assert!(rewards.iter().all(|r| r.reward_type != RewardType::Credit));
    // Stored in extraction order
    let stored: Vec<_> = rewards.iter().map(|r| r.to_record()).collect();
    let expected: Vec<_> = records
        .iter()
        .filter(|r| Sink::for_record(r) == Sink::Rewards)
        .cloned()
        .collect();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn test_scrape_catalog_end_to_end() {
    let db = Database::in_memory().unwrap();
    let extractor = RewardExtractor::new().unwrap();
    let catalog = CardCatalog {
        cards: vec![
            CardPage {
                name: "AMEX Blue Cash Preferred Card".into(),
                url: "https://amex.test/bcp".into(),
            },
            CardPage {
                name: profiles::CAPITAL_ONE_QUICKSILVER.into(),
                url: "https://c1.test/quicksilver".into(),
            },
        ],
    };
    let source = FixturePages(HashMap::from([
        ("https://amex.test/bcp", amex_page()),
        ("https://c1.test/quicksilver", quicksilver_page()),
    ]));

    let summary = run_scrape(&source, &extractor, &db, &catalog, ScrapeOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.cards.len(), 2);
    assert_eq!(summary.totals.offers, 1);
    assert_eq!(summary.totals.rewards, 5);
    assert_eq!(db.count_rewards().unwrap(), 5);
    assert_eq!(db.count_offers().unwrap(), 1);
    assert_eq!(
        db.stored_cards().unwrap(),
        vec!["AMEX Blue Cash Preferred Card", "CapitalOne Quicksilver Rewards"]
    );

    // A second run replaces rather than accumulates
    run_scrape(&source, &extractor, &db, &catalog, ScrapeOptions::default())
        .await
        .unwrap();
    assert_eq!(db.count_rewards().unwrap(), 5);

    let runs = db.list_scrape_runs(10).unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|r| r.status == RunStatus::Completed));
}

#[test]
fn test_embedded_catalog_profiles() {
    let extractor = RewardExtractor::new().unwrap();
    let catalog = CardCatalog::embedded().unwrap();

    let profiled: Vec<_> = catalog
        .cards
        .iter()
        .filter(|c| extractor.profile_for(&c.name).name != profiles::GENERIC)
        .map(|c| c.name.as_str())
        .collect();

    // Every dedicated profile has a catalog page
    let mut known = extractor.known_cards();
    let mut profiled_sorted = profiled.clone();
    known.sort_unstable();
    profiled_sorted.sort_unstable();
    assert_eq!(profiled_sorted, known);
}
