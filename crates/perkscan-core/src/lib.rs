//! Perkscan Core Library
//!
//! Shared functionality for the perkscan card rewards scraper:
//! - Reward extraction with per-card rule profiles
//! - Category normalization into a fixed vocabulary
//! - Routing of records into the rewards and offers collections
//! - Database access and migrations (SQLCipher when keyed)
//! - Page fetching and HTML flattening
//! - Scrape runs over a configurable card catalog

pub mod category;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod scrape;
pub mod sink;

pub use category::normalize;
pub use config::{CardCatalog, CardPage, FetchConfig, StoreConfig, DB_KEY_ENV};
pub use db::Database;
pub use error::{Error, Result};
pub use extract::{clean_text, RewardExtractor};
pub use fetch::{html_to_text, HttpPageSource, PageSource};
pub use models::*;
pub use scrape::{run_scrape, CardOutcome, ScrapeOptions, ScrapeSummary};
pub use sink::{dispatch, RewardStore};
