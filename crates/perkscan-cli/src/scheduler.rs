//! Periodic scrape scheduler for `perkscan watch`
//!
//! The interval comes from `--every-hours`, falling back to the
//! `PERKSCAN_SCRAPE_HOURS` environment variable and then 6 hours. An interval
//! of 0 disables scheduling.
//!
//! The first run starts immediately. A failed run is logged and the loop waits
//! for the next tick.

use std::future::Future;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, info, warn};

use perkscan_core::{run_scrape, CardCatalog, Database, PageSource, RewardExtractor, ScrapeOptions};

/// Environment variable holding the scrape interval in hours
pub const SCRAPE_HOURS_ENV: &str = "PERKSCAN_SCRAPE_HOURS";

const DEFAULT_INTERVAL_HOURS: u64 = 6;

/// Longest accepted interval (one year)
pub const MAX_INTERVAL_HOURS: u64 = 24 * 365;

/// Configuration for scheduled scrapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeScheduleConfig {
    /// Interval between runs in hours
    pub interval_hours: u64,
}

impl ScrapeScheduleConfig {
    /// Resolve the interval from the flag, the environment, then the default
    ///
    /// Returns None if scheduling is disabled (interval of 0)
    pub fn resolve(flag: Option<u64>) -> Option<Self> {
        let env = std::env::var(SCRAPE_HOURS_ENV).ok();
        Self::from_sources(flag, env.as_deref())
    }

    fn from_sources(flag: Option<u64>, env: Option<&str>) -> Option<Self> {
        let interval_hours = match flag {
            Some(hours) => hours,
            None => match env.map(str::trim) {
                Some(raw) => raw.parse().unwrap_or_else(|_| {
                    warn!(
                        "{} is not a number ({:?}), using {} hours",
                        SCRAPE_HOURS_ENV, raw, DEFAULT_INTERVAL_HOURS
                    );
                    DEFAULT_INTERVAL_HOURS
                }),
                None => DEFAULT_INTERVAL_HOURS,
            },
        };

        if interval_hours == 0 {
            warn!("Scrape interval is 0, scheduling disabled");
            return None;
        }

        if interval_hours > MAX_INTERVAL_HOURS {
            warn!(
                "Scrape interval of {} hours is too long, using {} hours",
                interval_hours, MAX_INTERVAL_HOURS
            );
            return Some(Self {
                interval_hours: MAX_INTERVAL_HOURS,
            });
        }

        Some(Self { interval_hours })
    }

    pub fn interval(&self) -> Duration {
        let hours = self.interval_hours.min(MAX_INTERVAL_HOURS);
        Duration::from_secs(hours * 3600)
    }
}

/// Scrape on every tick until `shutdown` resolves
///
/// Returns the number of runs that completed successfully.
pub async fn run_scheduled_scrapes<P, F>(
    source: &P,
    extractor: &RewardExtractor,
    db: &Database,
    catalog: &CardCatalog,
    options: ScrapeOptions,
    config: &ScrapeScheduleConfig,
    shutdown: F,
) -> usize
where
    P: PageSource + ?Sized,
    F: Future<Output = ()>,
{
    info!(
        "Starting scrape scheduler: every {} hours over {} cards",
        config.interval_hours,
        catalog.len()
    );

    let mut ticker = interval(config.interval());
    let mut completed = 0;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Scrape scheduler stopping");
                break;
            }
            _ = ticker.tick() => {
                info!("Running scheduled scrape...");
                match run_scrape(source, extractor, db, catalog, options).await {
                    Ok(summary) => {
                        completed += 1;
                        info!(
                            "Scheduled scrape completed: {} rewards, {} offers. Next run in {} hours",
                            summary.totals.rewards, summary.totals.offers, config.interval_hours
                        );
                    }
                    Err(e) => {
                        error!("Scheduled scrape failed: {}", e);
                    }
                }
            }
        }
    }

    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use perkscan_core::{CardPage, Error, Result};

    struct OnePage;

    #[async_trait]
    impl PageSource for OnePage {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            if url.ends_with("/down") {
                return Err(Error::Fetch(format!("{} returned HTTP 503", url)));
            }
            Ok("Earn unlimited 1.5% cash back on every purchase".to_string())
        }
    }

    fn catalog(url: &str) -> CardCatalog {
        CardCatalog {
            cards: vec![CardPage {
                name: "CapitalOne Quicksilver Rewards".into(),
                url: url.into(),
            }],
        }
    }

    #[test]
    fn test_interval_resolution() {
        assert_eq!(
            ScrapeScheduleConfig::from_sources(None, None),
            Some(ScrapeScheduleConfig { interval_hours: 6 })
        );
        assert_eq!(
            ScrapeScheduleConfig::from_sources(None, Some("12")),
            Some(ScrapeScheduleConfig { interval_hours: 12 })
        );
        // Flag wins over environment
        assert_eq!(
            ScrapeScheduleConfig::from_sources(Some(2), Some("12")),
            Some(ScrapeScheduleConfig { interval_hours: 2 })
        );
        assert_eq!(
            ScrapeScheduleConfig::from_sources(None, Some("often")),
            Some(ScrapeScheduleConfig { interval_hours: 6 })
        );
    }

    #[test]
    fn test_zero_disables() {
        assert!(ScrapeScheduleConfig::from_sources(Some(0), None).is_none());
        assert!(ScrapeScheduleConfig::from_sources(None, Some("0")).is_none());
    }

    #[test]
    fn test_oversized_interval_is_clamped() {
        let config = ScrapeScheduleConfig::from_sources(None, Some("18446744073709551615")).unwrap();
        assert_eq!(config.interval_hours, MAX_INTERVAL_HOURS);
        assert_eq!(config.interval(), Duration::from_secs(MAX_INTERVAL_HOURS * 3600));

        let config = ScrapeScheduleConfig::from_sources(Some(u64::MAX), None).unwrap();
        assert_eq!(config.interval_hours, MAX_INTERVAL_HOURS);

        let built = ScrapeScheduleConfig {
            interval_hours: u64::MAX,
        };
        assert_eq!(built.interval(), Duration::from_secs(MAX_INTERVAL_HOURS * 3600));
    }

    #[test]
    fn test_interval_duration() {
        let config = ScrapeScheduleConfig { interval_hours: 6 };
        assert_eq!(config.interval(), Duration::from_secs(21_600));
    }

    #[tokio::test]
    async fn test_first_run_is_immediate() {
        let db = Database::in_memory().unwrap();
        let extractor = RewardExtractor::new().unwrap();
        let config = ScrapeScheduleConfig { interval_hours: 1 };

        let runs = run_scheduled_scrapes(
            &OnePage,
            &extractor,
            &db,
            &catalog("https://c1.test/quicksilver"),
            ScrapeOptions::default(),
            &config,
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await;

        assert_eq!(runs, 1);
        assert_eq!(db.count_rewards().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_run_keeps_scheduler_alive() {
        let db = Database::in_memory().unwrap();
        let extractor = RewardExtractor::new().unwrap();
        let config = ScrapeScheduleConfig { interval_hours: 1 };

        let runs = run_scheduled_scrapes(
            &OnePage,
            &extractor,
            &db,
            &catalog("https://c1.test/down"),
            ScrapeOptions::default(),
            &config,
            tokio::time::sleep(Duration::from_millis(300)),
        )
        .await;

        assert_eq!(runs, 0);
        let history = db.list_scrape_runs(5).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, perkscan_core::RunStatus::Failed);
    }
}
