//! Rewards and offers collections

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Category, RewardRecord, RewardType, Sink, StoredReward};
use crate::sink::RewardStore;

impl Database {
    /// Append a record to the rewards collection
    pub fn append_reward(&self, card_name: &str, record: &RewardRecord) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO rewards (card_name, reward_type, category, reward, full_text, spending_limit)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                card_name,
                record.reward_type.as_str(),
                record.category.as_str(),
                record.reward,
                record.full_text,
                record.limit,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Append a record to the offers collection
    ///
    /// The reward value is stored in the `offer` column.
    pub fn append_offer(&self, card_name: &str, record: &RewardRecord) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO offers (card_name, reward_type, category, offer, full_text, spending_limit)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                card_name,
                record.reward_type.as_str(),
                record.category.as_str(),
                record.reward,
                record.full_text,
                record.limit,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List stored rewards in insertion order, optionally for a single card
    pub fn list_rewards(&self, card_name: Option<&str>) -> Result<Vec<StoredReward>> {
        self.list_sink(Sink::Rewards, card_name)
    }

    /// List stored offers in insertion order, optionally for a single card
    pub fn list_offers(&self, card_name: Option<&str>) -> Result<Vec<StoredReward>> {
        self.list_sink(Sink::Offers, card_name)
    }

    fn list_sink(&self, sink: Sink, card_name: Option<&str>) -> Result<Vec<StoredReward>> {
        let conn = self.conn()?;
        let (table, value_column) = match sink {
            Sink::Rewards => ("rewards", "reward"),
            Sink::Offers => ("offers", "offer"),
        };
        let sql = format!(
            r#"
            SELECT id, card_name, reward_type, category, {value_column}, full_text, spending_limit, created_at
            FROM {table}
            WHERE ?1 IS NULL OR card_name = ?1
            ORDER BY id
            "#
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![card_name], |row| {
                let reward_type: String = row.get(2)?;
                let category: String = row.get(3)?;
                let created_at: String = row.get(7)?;
                Ok(StoredReward {
                    id: row.get(0)?,
                    card_name: row.get(1)?,
                    sink,
                    reward_type: reward_type.parse().unwrap_or(RewardType::Cashback),
                    category: category.parse().unwrap_or(Category::OtherPurchases),
                    reward: row.get(4)?,
                    full_text: row.get(5)?,
                    limit: row.get(6)?,
                    created_at: parse_datetime(&created_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    pub fn count_rewards(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM rewards", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn count_offers(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM offers", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Distinct card names with at least one stored record, sorted
    pub fn stored_cards(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT card_name FROM rewards
            UNION
            SELECT card_name FROM offers
            ORDER BY card_name
            "#,
        )?;
        let cards = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(cards)
    }

    /// Remove every stored reward and offer
    ///
    /// Returns the number of rows deleted across both collections.
    pub fn clear_collections(&self) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let rewards = tx.execute("DELETE FROM rewards", [])?;
        let offers = tx.execute("DELETE FROM offers", [])?;
        tx.commit()?;
        Ok(rewards + offers)
    }
}

impl RewardStore for Database {
    fn append(&self, sink: Sink, card_name: &str, record: &RewardRecord) -> Result<i64> {
        match sink {
            Sink::Rewards => self.append_reward(card_name, record),
            Sink::Offers => self.append_offer(card_name, record),
        }
    }
}
