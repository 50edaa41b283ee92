//! Domain models for perkscan

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standardized spending category every extracted reward is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Groceries")]
    Groceries,
    #[serde(rename = "U.S. Online Retail Purchases")]
    OnlineRetail,
    #[serde(rename = "Gas")]
    Gas,
    #[serde(rename = "other purchases")]
    OtherPurchases,
    #[serde(rename = "Streaming Subscriptions")]
    Streaming,
    #[serde(rename = "Transit")]
    Transit,
    #[serde(rename = "Food Services")]
    FoodServices,
    #[serde(rename = "Hotels")]
    Hotels,
    #[serde(rename = "Capital One Hotels")]
    CapitalOneHotels,
    #[serde(rename = "Wholesale Clubs")]
    WholesaleClubs,
    #[serde(rename = "drugstore")]
    Drugstore,
}

impl Category {
    /// Display label, as written to the stores
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "Groceries",
            Self::OnlineRetail => "U.S. Online Retail Purchases",
            Self::Gas => "Gas",
            Self::OtherPurchases => "other purchases",
            Self::Streaming => "Streaming Subscriptions",
            Self::Transit => "Transit",
            Self::FoodServices => "Food Services",
            Self::Hotels => "Hotels",
            Self::CapitalOneHotels => "Capital One Hotels",
            Self::WholesaleClubs => "Wholesale Clubs",
            Self::Drugstore => "drugstore",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Groceries,
            Self::OnlineRetail,
            Self::Gas,
            Self::OtherPurchases,
            Self::Streaming,
            Self::Transit,
            Self::FoodServices,
            Self::Hotels,
            Self::CapitalOneHotels,
            Self::WholesaleClubs,
            Self::Drugstore,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Parse a stored label (case-insensitive)
    ///
    /// Only exact labels are accepted. Free text goes through
    /// [`crate::category::normalize`] instead.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tag identifying which extraction rule produced a reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    /// Discover rotating 5% category
    #[serde(rename = "discover_cashback_5")]
    DiscoverCashback5,
    /// Discover flat 1% on everything else
    #[serde(rename = "discover_cashback_1")]
    DiscoverCashback1,
    /// Chase Freedom Unlimited tiers
    Freedom,
    CashbackSavor,
    CashbackSavorTravel,
    CashbackSavorGrocery,
    CashbackSavorOther,
    CashbackQuicksilver,
    /// Generic "N% CASH BACK On ..."
    Cashback,
    /// Generic "NX POINTS On ..."
    Points,
    /// Sign-up bonus points
    WelcomePoints,
    /// One-time statement credit (routed to offers)
    Credit,
}

impl RewardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DiscoverCashback5 => "discover_cashback_5",
            Self::DiscoverCashback1 => "discover_cashback_1",
            Self::Freedom => "freedom",
            Self::CashbackSavor => "cashback_savor",
            Self::CashbackSavorTravel => "cashback_savor_travel",
            Self::CashbackSavorGrocery => "cashback_savor_grocery",
            Self::CashbackSavorOther => "cashback_savor_other",
            Self::CashbackQuicksilver => "cashback_quicksilver",
            Self::Cashback => "cashback",
            Self::Points => "points",
            Self::WelcomePoints => "welcome_points",
            Self::Credit => "credit",
        }
    }

    /// Every tag used by any extraction profile
    pub fn all() -> &'static [RewardType] {
        &[
            Self::DiscoverCashback5,
            Self::DiscoverCashback1,
            Self::Freedom,
            Self::CashbackSavor,
            Self::CashbackSavorTravel,
            Self::CashbackSavorGrocery,
            Self::CashbackSavorOther,
            Self::CashbackQuicksilver,
            Self::Cashback,
            Self::Points,
            Self::WelcomePoints,
            Self::Credit,
        ]
    }
}

impl std::str::FromStr for RewardType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| format!("Unknown reward type: {}", s))
    }
}

impl std::fmt::Display for RewardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reward parsed from a card's marketing text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRecord {
    pub reward_type: RewardType,
    /// Display value, e.g. "5%", "3X POINTS", "$200 statement credit"
    pub reward: String,
    pub category: Category,
    /// The matched excerpt, trimmed
    pub full_text: String,
    /// Amount from an "up to $N" phrase inside the match (digits and commas)
    pub limit: Option<String>,
}

/// Destination store for a reward record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sink {
    /// Ongoing earn rates
    Rewards,
    /// One-time statement credits
    Offers,
}

impl Sink {
    /// Statement credits go to offers; everything else is an ongoing reward
    pub fn for_type(reward_type: RewardType) -> Self {
        match reward_type {
            RewardType::Credit => Self::Offers,
            _ => Self::Rewards,
        }
    }

    pub fn for_record(record: &RewardRecord) -> Self {
        Self::for_type(record.reward_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rewards => "rewards",
            Self::Offers => "offers",
        }
    }
}

impl std::fmt::Display for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reward or offer as persisted in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReward {
    pub id: i64,
    pub card_name: String,
    pub sink: Sink,
    pub reward_type: RewardType,
    pub category: Category,
    pub reward: String,
    pub full_text: String,
    pub limit: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredReward {
    /// Strip storage metadata, leaving the extracted record
    pub fn to_record(&self) -> RewardRecord {
        RewardRecord {
            reward_type: self.reward_type,
            reward: self.reward.clone(),
            category: self.category,
            full_text: self.full_text.clone(),
            limit: self.limit.clone(),
        }
    }
}

/// Per-sink counts from storing one batch of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    pub rewards: usize,
    pub offers: usize,
}

impl DispatchStats {
    pub fn total(&self) -> usize {
        self.rewards + self.offers
    }
}

impl std::ops::AddAssign for DispatchStats {
    fn add_assign(&mut self, other: Self) {
        self.rewards += other.rewards;
        self.offers += other.offers;
    }
}

/// Lifecycle of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Unknown run status: {}", s)),
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded pass over the card catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeRun {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub cards_scraped: i64,
    pub rewards_stored: i64,
    pub offers_stored: i64,
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_labels_round_trip() {
        for category in Category::all() {
            assert_eq!(Category::from_str(category.as_str()).unwrap(), *category);
        }
        assert_eq!(
            Category::from_str("Other purchases").unwrap(),
            Category::OtherPurchases
        );
        assert!(Category::from_str("Travel").is_err());
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::OnlineRetail).unwrap();
        assert_eq!(json, "\"U.S. Online Retail Purchases\"");
    }

    #[test]
    fn test_reward_type_tags() {
        assert_eq!(RewardType::DiscoverCashback5.as_str(), "discover_cashback_5");
        assert_eq!(
            serde_json::to_string(&RewardType::CashbackSavorTravel).unwrap(),
            "\"cashback_savor_travel\""
        );
        for t in RewardType::all() {
            assert_eq!(RewardType::from_str(t.as_str()).unwrap(), *t);
        }
    }

    #[test]
    fn test_run_status_parse() {
        assert_eq!(RunStatus::from_str("Completed").unwrap(), RunStatus::Completed);
        assert_eq!(RunStatus::default(), RunStatus::Running);
        assert!(RunStatus::from_str("paused").is_err());
    }

    #[test]
    fn test_routing_sweep() {
        for t in RewardType::all() {
            let expected = if *t == RewardType::Credit {
                Sink::Offers
            } else {
                Sink::Rewards
            };
            assert_eq!(Sink::for_type(*t), expected, "routing for {}", t);
        }
    }

    #[test]
    fn test_limit_serializes_as_null() {
        let record = RewardRecord {
            reward_type: RewardType::Cashback,
            reward: "2%".into(),
            category: Category::Gas,
            full_text: "2% CASH BACK On Gas".into(),
            limit: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value["limit"].is_null());
        assert_eq!(value["category"], "Gas");
    }
}
