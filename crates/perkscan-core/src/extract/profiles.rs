//! Built-in extraction profiles
//!
//! One profile per known card page template, plus the generic profile used
//! for every other card. Patterns are matched case-insensitively.

use super::rule::{CategorySource, DedupKind, RewardFormat, RuleSpec};
use crate::models::RewardType;

pub const DISCOVER_IT_STUDENT: &str = "Discover It Student Card";
pub const CHASE_FREEDOM_UNLIMITED: &str = "Chase Freedom Unlimited";
pub const CAPITAL_ONE_SAVOR: &str = "CapitalOne Savor Card";
pub const CAPITAL_ONE_QUICKSILVER: &str = "CapitalOne Quicksilver Rewards";

/// Name reported for the fallback profile
pub const GENERIC: &str = "generic";

/// Discover it Student: rotating 5% quarter plus flat 1%
pub const DISCOVER_IT_STUDENT_RULES: &[RuleSpec] = &[
    RuleSpec {
        reward_type: RewardType::DiscoverCashback5,
        pattern: r"Where\s+can\s+you\s+get\s+5%\s+cash\s+back\s+today\?\s*[A-Za-z0-9.\s-]+\s+(?P<category>.+?)\s+Earn\s+5%\s+Cashback\s+Bonus",
        reward: RewardFormat::Fixed("5%"),
        category: CategorySource::Captured,
        dedup: DedupKind::TypeRewardCategory,
        boundary: None,
    },
    RuleSpec {
        reward_type: RewardType::DiscoverCashback1,
        pattern: r"earn\s+1%\s+cash\s+back\s+on\s+all\s+other\s+purchases",
        reward: RewardFormat::Fixed("1%"),
        category: CategorySource::Literal("All Purchases"),
        dedup: DedupKind::TypeRewardCategory,
        boundary: None,
    },
];

/// Chase Freedom Unlimited: fixed category tiers
pub const CHASE_FREEDOM_UNLIMITED_RULES: &[RuleSpec] = &[
    RuleSpec {
        reward_type: RewardType::Freedom,
        pattern: r"Earn\s+(?P<percent>\d+)%\s+on\s+dining\s+at\s+restaurants(?:,\s+including\s+takeout\s+and\s+eligible\s+delivery\s+services)?\.?",
        reward: RewardFormat::Percent,
        category: CategorySource::Literal("Dining at Restaurants"),
        dedup: DedupKind::TypeRewardCategory,
        boundary: None,
    },
    RuleSpec {
        reward_type: RewardType::Freedom,
        pattern: r"Earn\s+(?P<percent>\d+)%\s+on\s+drugstore\s+purchases\.?",
        reward: RewardFormat::Percent,
        category: CategorySource::Literal("Drugstore Purchases"),
        dedup: DedupKind::TypeRewardCategory,
        boundary: None,
    },
    RuleSpec {
        reward_type: RewardType::Freedom,
        pattern: r"Earn\s+(?P<percent>\d+)%\s+on\s+travel\s+purchased\s+through\s+Chase\s+TravelSM\.?",
        reward: RewardFormat::Percent,
        // No standardized travel bucket; lands in other purchases
        category: CategorySource::Literal("Travel Purchased through Chase TravelSM"),
        dedup: DedupKind::TypeRewardCategory,
        boundary: None,
    },
    RuleSpec {
        reward_type: RewardType::Freedom,
        pattern: r"Earn\s+(?P<percent>\d+(?:\.\d+)?)%\s+on\s+all\s+other\s+purchases\*?",
        reward: RewardFormat::Percent,
        category: CategorySource::Literal("All Other Purchases"),
        dedup: DedupKind::TypeRewardCategory,
        boundary: None,
    },
];

/// Capital One Savor: open-ended category plus three fixed tiers
pub const CAPITAL_ONE_SAVOR_RULES: &[RuleSpec] = &[
    RuleSpec {
        reward_type: RewardType::CashbackSavor,
        pattern: r"Earn\s+unlimited\s+(?P<percent>\d+)%\s+cash\s+back\s+on\s+(?P<category>[^,]+)",
        reward: RewardFormat::Percent,
        category: CategorySource::Captured,
        dedup: DedupKind::TypeRewardCategory,
        boundary: None,
    },
    RuleSpec {
        reward_type: RewardType::CashbackSavorTravel,
        pattern: r"Earn\s+unlimited\s+(?P<percent>\d+)%\s+cash\s+back\s+on\s+hotels\s+and\s+rental\s+cars\s+booked\s+through\s+Capital\s+One\s+Travel",
        reward: RewardFormat::Percent,
        category: CategorySource::Literal("Capital One Hotels"),
        dedup: DedupKind::TypeRewardCategory,
        boundary: None,
    },
    RuleSpec {
        reward_type: RewardType::CashbackSavorGrocery,
        pattern: r"Earn\s+unlimited\s+(?P<percent>\d+)%\s+cash\s+back\s+at\s+grocery\s+stores",
        reward: RewardFormat::Percent,
        category: CategorySource::Literal("Groceries"),
        dedup: DedupKind::TypeRewardCategory,
        boundary: None,
    },
    RuleSpec {
        reward_type: RewardType::CashbackSavorOther,
        pattern: r"Earn\s+unlimited\s+(?P<percent>\d+)%\s+cash\s+back\s+on\s+all\s+other\s+purchases",
        reward: RewardFormat::Percent,
        category: CategorySource::Literal("other purchases"),
        dedup: DedupKind::TypeRewardCategory,
        boundary: None,
    },
];

/// Capital One Quicksilver: one flat rate
pub const CAPITAL_ONE_QUICKSILVER_RULES: &[RuleSpec] = &[RuleSpec {
    reward_type: RewardType::CashbackQuicksilver,
    pattern: r"Earn\s+unlimited\s+(?P<percent>\d+(?:\.\d+)?)%\s+cash\s+back\s+on\s+every\s+purchase",
    reward: RewardFormat::Percent,
    category: CategorySource::Literal("All Purchases"),
    dedup: DedupKind::TypeRewardCategory,
    boundary: None,
}];

/// Fallback for unprofiled cards (e.g. AMEX pages)
pub const GENERIC_RULES: &[RuleSpec] = &[
    RuleSpec {
        reward_type: RewardType::Cashback,
        pattern: r"(?P<percent>\d+)%\s*CASH\s+BACK\s+On\s+(?P<category>[^0-9]+)",
        reward: RewardFormat::Percent,
        category: CategorySource::Captured,
        dedup: DedupKind::TypeRewardCategory,
        boundary: Some(r"\s+\d+%\s*CASH\s+BACK"),
    },
    RuleSpec {
        reward_type: RewardType::Points,
        pattern: r"(?P<multiplier>\d+X)\s+POINTS\s+On\s+(?P<category>[^0-9]+)",
        reward: RewardFormat::Multiplier,
        category: CategorySource::Captured,
        dedup: DedupKind::TypeRewardCategory,
        boundary: Some(r"\s+\d+X\s+(?:POINTS|MEMBERSHIP\s+REWARDS\s+POINTS)"),
    },
    RuleSpec {
        reward_type: RewardType::WelcomePoints,
        pattern: r"Earn\s+(?P<points_count>[\d,]+)\s+(?:Membership\s+Rewards\s+®?\s*Points|Points)",
        reward: RewardFormat::WelcomePoints,
        category: CategorySource::Literal("other purchases"),
        dedup: DedupKind::TypeReward,
        boundary: None,
    },
    RuleSpec {
        reward_type: RewardType::Credit,
        pattern: r"(?P<credit>\$\d+)\s+.*?statement\s+credit",
        reward: RewardFormat::StatementCredit,
        category: CategorySource::Default,
        dedup: DedupKind::TypeReward,
        boundary: None,
    },
];

/// Every card-specific profile, keyed by exact card name
pub const CARD_PROFILES: &[(&str, &[RuleSpec])] = &[
    (DISCOVER_IT_STUDENT, DISCOVER_IT_STUDENT_RULES),
    (CHASE_FREEDOM_UNLIMITED, CHASE_FREEDOM_UNLIMITED_RULES),
    (CAPITAL_ONE_SAVOR, CAPITAL_ONE_SAVOR_RULES),
    (CAPITAL_ONE_QUICKSILVER, CAPITAL_ONE_QUICKSILVER_RULES),
];
