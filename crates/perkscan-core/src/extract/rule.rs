//! Extraction rules and profiles
//!
//! A rule is plain data ([`RuleSpec`]) compiled once into an [`ExtractionRule`].
//! A [`Profile`] is an ordered list of rules for one card page template; all
//! profiles share the same application algorithm in [`Profile::apply`].

use std::collections::HashSet;

use regex::{Captures, Regex, RegexBuilder};
use tracing::debug;

use crate::category::normalize;
use crate::error::Result;
use crate::models::{Category, RewardRecord, RewardType};

/// How the display reward string is built from a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardFormat {
    /// Constant value, e.g. "5%"
    Fixed(&'static str),
    /// `percent` group + "%"
    Percent,
    /// `multiplier` group + " POINTS"
    Multiplier,
    /// "Earn " + `points_count` group + " Points"
    WelcomePoints,
    /// `credit` group + " statement credit"
    StatementCredit,
}

/// Where a record's category comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySource {
    /// A fixed phrase, still run through the normalizer
    Literal(&'static str),
    /// The `category` capture group, whitespace-collapsed then normalized
    Captured,
    /// Normalization of an empty phrase
    Default,
}

/// Which record fields make up the duplicate-suppression key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupKind {
    TypeRewardCategory,
    TypeReward,
    TypeFullText,
}

/// Key used to suppress duplicate records within one extraction pass
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Categorized(RewardType, String, Category),
    Reward(RewardType, String),
    Text(RewardType, String),
}

impl DedupKind {
    pub fn key_for(&self, record: &RewardRecord) -> DedupKey {
        match self {
            Self::TypeRewardCategory => {
                DedupKey::Categorized(record.reward_type, record.reward.clone(), record.category)
            }
            Self::TypeReward => DedupKey::Reward(record.reward_type, record.reward.clone()),
            Self::TypeFullText => DedupKey::Text(record.reward_type, record.full_text.clone()),
        }
    }
}

/// Static description of one rule
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub reward_type: RewardType,
    pub pattern: &'static str,
    pub reward: RewardFormat,
    pub category: CategorySource,
    pub dedup: DedupKind,
    /// Phrase that ends a trailing `category` capture
    ///
    /// When set, `pattern` must end in a greedy digit-free `category` group.
    /// The capture is cut at the whitespace before the next digit and the
    /// match is kept only if the text continues with this phrase there, or
    /// if the capture ran to the end of the text.
    pub boundary: Option<&'static str>,
}

/// A compiled rule
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub reward_type: RewardType,
    pattern: Regex,
    reward: RewardFormat,
    category: CategorySource,
    dedup: DedupKind,
    boundary: Option<Regex>,
}

/// One accepted match of a rule
struct Hit<'t> {
    caps: Captures<'t>,
    full: &'t str,
    category: Option<&'t str>,
}

impl<'t> Hit<'t> {
    fn group(&self, name: &str) -> &'t str {
        self.caps.name(name).map(|m| m.as_str().trim()).unwrap_or("")
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

impl ExtractionRule {
    pub fn compile(spec: &RuleSpec) -> Result<Self> {
        let boundary = match spec.boundary {
            Some(phrase) => Some(case_insensitive(&format!("^(?:{})", phrase))?),
            None => None,
        };
        Ok(Self {
            reward_type: spec.reward_type,
            pattern: case_insensitive(spec.pattern)?,
            reward: spec.reward,
            category: spec.category,
            dedup: spec.dedup,
            boundary,
        })
    }

    /// All non-overlapping matches, in text order
    fn hits<'t>(&self, text: &'t str) -> Vec<Hit<'t>> {
        let Some(boundary) = &self.boundary else {
            return self
                .pattern
                .captures_iter(text)
                .map(|caps| {
                    let full = caps.get(0).map(|m| m.as_str()).unwrap_or("");
                    let category = caps.name("category").map(|m| m.as_str());
                    Hit {
                        caps,
                        full,
                        category,
                    }
                })
                .collect();
        };

        let mut hits = Vec::new();
        let mut at = 0;
        while at <= text.len() {
            let Some(caps) = self.pattern.captures_at(text, at) else {
                break;
            };
            let (Some(whole), Some(cat)) = (caps.get(0), caps.name("category")) else {
                break;
            };

            if cat.end() == text.len() {
                // Capture ran to the end of the text
                hits.push(Hit {
                    full: &text[whole.start()..],
                    category: Some(cat.as_str()),
                    caps,
                });
                break;
            }

            // A blank capture is kept (it normalizes to other purchases)
            let cut = cat.start() + cat.as_str().trim_end().len();
            let accepted = cut < cat.end() && boundary.is_match(&text[cut..]);

            if accepted {
                hits.push(Hit {
                    full: &text[whole.start()..cut],
                    category: Some(&text[cat.start()..cut]),
                    caps,
                });
                at = cut;
            } else {
                // Nothing between here and the next digit can start a match
                at = cat.end();
            }
        }
        hits
    }

    fn build(&self, hit: &Hit<'_>, limit: &Regex) -> RewardRecord {
        let reward = match self.reward {
            RewardFormat::Fixed(value) => value.to_string(),
            RewardFormat::Percent => format!("{}%", hit.group("percent")),
            RewardFormat::Multiplier => format!("{} POINTS", hit.group("multiplier")),
            RewardFormat::WelcomePoints => format!("Earn {} Points", hit.group("points_count")),
            RewardFormat::StatementCredit => {
                format!("{} statement credit", hit.group("credit"))
            }
        };

        let category = match self.category {
            CategorySource::Literal(phrase) => normalize(phrase),
            CategorySource::Captured => match hit.category {
                Some(raw) => normalize(&collapse_whitespace(raw)),
                None => Category::OtherPurchases,
            },
            CategorySource::Default => normalize(""),
        };

        let limit = limit
            .captures(hit.full)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        RewardRecord {
            reward_type: self.reward_type,
            reward,
            category,
            full_text: hit.full.trim().to_string(),
            limit,
        }
    }
}

/// Collapse whitespace runs (including newlines) into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An ordered set of rules for one card page template
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: &'static str,
    rules: Vec<ExtractionRule>,
}

impl Profile {
    pub fn compile(name: &'static str, specs: &[RuleSpec]) -> Result<Self> {
        let rules = specs
            .iter()
            .map(ExtractionRule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name, rules })
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    /// Run every rule over `text` and collect deduplicated records
    ///
    /// Records come back in rule order, then match order within a rule.
    pub fn apply(&self, text: &str, limit: &Regex) -> Vec<RewardRecord> {
        let mut seen: HashSet<DedupKey> = HashSet::new();
        let mut records = Vec::new();

        for rule in &self.rules {
            let hits = rule.hits(text);
            let before = records.len();
            for hit in &hits {
                let record = rule.build(hit, limit);
                if seen.insert(rule.dedup.key_for(&record)) {
                    records.push(record);
                }
            }
            debug!(
                "Profile '{}' rule {}: {} matches, {} kept",
                self.name,
                rule.reward_type,
                hits.len(),
                records.len() - before
            );
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_re() -> Regex {
        case_insensitive(r"up to \$([\d,]+)").unwrap()
    }

    const CASHBACK: RuleSpec = RuleSpec {
        reward_type: RewardType::Cashback,
        pattern: r"(?P<percent>\d+)%\s*CASH\s+BACK\s+On\s+(?P<category>[^0-9]+)",
        reward: RewardFormat::Percent,
        category: CategorySource::Captured,
        dedup: DedupKind::TypeRewardCategory,
        boundary: Some(r"\s+\d+%\s*CASH\s+BACK"),
    };

    #[test]
    fn test_boundary_cuts_before_next_entry() {
        let rule = ExtractionRule::compile(&CASHBACK).unwrap();
        let hits = rule.hits("3% CASH BACK On U.S. Online Retail Purchases 2% CASH BACK On Gas");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].category, Some("U.S. Online Retail Purchases"));
        assert_eq!(hits[0].full, "3% CASH BACK On U.S. Online Retail Purchases");
        assert_eq!(hits[1].category, Some("Gas"));
    }

    #[test]
    fn test_boundary_rejects_unrelated_digits() {
        let rule = ExtractionRule::compile(&CASHBACK).unwrap();
        // "6 months" is neither end of text nor another cash back entry
        let hits = rule.hits("3% CASH BACK On Groceries for 6 months");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_boundary_resumes_after_rejection() {
        let rule = ExtractionRule::compile(&CASHBACK).unwrap();
        let hits = rule.hits("3% CASH BACK On Groceries for 6 months. 1% CASH BACK On Other");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].group("percent"), "1");
        assert_eq!(hits[0].category, Some("Other"));
    }

    #[test]
    fn test_boundary_accepts_blank_category() {
        let rule = ExtractionRule::compile(&CASHBACK).unwrap();
        let hits = rule.hits("5% CASH BACK On   2% CASH BACK On Gas");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].category, Some(""));
        assert_eq!(hits[0].full.trim(), "5% CASH BACK On");

        let record = rule.build(&hits[0], &limit_re());
        assert_eq!(record.reward, "5%");
        assert_eq!(record.category, Category::OtherPurchases);
        assert_eq!(record.full_text, "5% CASH BACK On");
        assert_eq!(hits[1].category, Some("Gas"));
    }

    #[test]
    fn test_dedup_keys() {
        let record = RewardRecord {
            reward_type: RewardType::Credit,
            reward: "$200 statement credit".into(),
            category: Category::OtherPurchases,
            full_text: "$200 back as a statement credit".into(),
            limit: None,
        };
        assert_eq!(
            DedupKind::TypeReward.key_for(&record),
            DedupKey::Reward(RewardType::Credit, "$200 statement credit".into())
        );
        assert_eq!(
            DedupKind::TypeFullText.key_for(&record),
            DedupKey::Text(RewardType::Credit, "$200 back as a statement credit".into())
        );
    }

    #[test]
    fn test_full_text_dedup_keeps_distinct_text() {
        let spec = RuleSpec {
            dedup: DedupKind::TypeFullText,
            boundary: None,
            pattern: r"(?P<percent>\d+)%\s+back",
            ..CASHBACK
        };
        let profile = Profile::compile("test", &[spec]).unwrap();
        let records = profile.apply("5% back, 5% BACK, 5% back", &limit_re());
        // "5% back" twice collapses; "5% BACK" differs in text
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Gas\n  Stations \t"), "Gas Stations");
    }
}
