//! Scrape run history

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{DispatchStats, RunStatus, ScrapeRun};

impl Database {
    /// Record the start of a scrape run
    pub fn start_scrape_run(&self) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO scrape_runs (status) VALUES ('running')", [])?;
        Ok(conn.last_insert_rowid())
    }

    /// Mark a run completed with its totals
    pub fn complete_scrape_run(
        &self,
        run_id: i64,
        cards_scraped: usize,
        stats: &DispatchStats,
    ) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE scrape_runs SET
                status = 'completed',
                finished_at = CURRENT_TIMESTAMP,
                cards_scraped = ?,
                rewards_stored = ?,
                offers_stored = ?
            WHERE id = ?
            "#,
            params![
                cards_scraped as i64,
                stats.rewards as i64,
                stats.offers as i64,
                run_id
            ],
        )?;
        Ok(())
    }

    /// Mark a run failed
    pub fn fail_scrape_run(&self, run_id: i64, error_message: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE scrape_runs SET
                status = 'failed',
                finished_at = CURRENT_TIMESTAMP,
                error_message = ?
            WHERE id = ?
            "#,
            params![error_message, run_id],
        )?;
        Ok(())
    }

    /// Most recent runs first
    pub fn list_scrape_runs(&self, limit: i64) -> Result<Vec<ScrapeRun>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, started_at, finished_at, status, cards_scraped,
                   rewards_stored, offers_stored, error_message
            FROM scrape_runs
            ORDER BY id DESC
            LIMIT ?
            "#,
        )?;

        let runs = stmt
            .query_map(params![limit], |row| {
                let started_at: String = row.get(1)?;
                let finished_at: Option<String> = row.get(2)?;
                let status: String = row.get(3)?;
                Ok(ScrapeRun {
                    id: row.get(0)?,
                    started_at: parse_datetime(&started_at),
                    finished_at: finished_at.as_deref().map(parse_datetime),
                    status: status.parse().unwrap_or(RunStatus::Failed),
                    cards_scraped: row.get(4)?,
                    rewards_stored: row.get(5)?,
                    offers_stored: row.get(6)?,
                    error_message: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(runs)
    }
}
