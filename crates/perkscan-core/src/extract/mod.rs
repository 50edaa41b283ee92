//! Reward extraction from card marketing text
//!
//! [`RewardExtractor`] holds the compiled profiles. It picks a profile by exact
//! card name, falling back to the generic profile, and turns one page's text
//! into an ordered, deduplicated list of [`RewardRecord`]s. Extraction never
//! fails: text that matches nothing yields an empty list.
//!
//! ```no_run
//! use perkscan_core::extract::RewardExtractor;
//!
//! let extractor = RewardExtractor::new()?;
//! let records = extractor.extract(
//!     "Earn unlimited 1.5% cash back on every purchase",
//!     "CapitalOne Quicksilver Rewards",
//! );
//! assert_eq!(records[0].reward, "1.5%");
//! # Ok::<(), perkscan_core::Error>(())
//! ```

pub mod profiles;
mod rule;

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::Result;
use crate::models::RewardRecord;

pub use rule::{
    collapse_whitespace, CategorySource, DedupKey, DedupKind, ExtractionRule, Profile,
    RewardFormat, RuleSpec,
};

/// Decorative glyphs some issuers sprinkle through their copy
const MARKER_GLYPHS: &[&str] = &["\u{a4}", "\u{2021}", "\u{2666}\u{fe0e}", "\u{2666}"];

/// Replace marker glyphs with spaces
pub fn clean_text(raw: &str) -> String {
    let mut text = raw.to_string();
    for glyph in MARKER_GLYPHS {
        if text.contains(glyph) {
            text = text.replace(glyph, " ");
        }
    }
    text
}

/// Compiled extraction profiles with card-name dispatch
#[derive(Debug, Clone)]
pub struct RewardExtractor {
    profiles: HashMap<&'static str, Profile>,
    generic: Profile,
    limit: Regex,
}

impl RewardExtractor {
    /// Compile the built-in profiles
    pub fn new() -> Result<Self> {
        let profiles = profiles::CARD_PROFILES
            .iter()
            .map(|(name, specs)| Ok((*name, Profile::compile(name, specs)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            profiles,
            generic: Profile::compile(profiles::GENERIC, profiles::GENERIC_RULES)?,
            limit: RegexBuilder::new(r"up to \$([\d,]+)")
                .case_insensitive(true)
                .build()?,
        })
    }

    /// Profile for a card name (exact match), or the generic profile
    pub fn profile_for(&self, card_name: &str) -> &Profile {
        self.profiles.get(card_name).unwrap_or(&self.generic)
    }

    /// Names of cards with a dedicated profile, sorted
    pub fn known_cards(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.profiles.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Extract reward records from one page's text
    pub fn extract(&self, raw_text: &str, card_name: &str) -> Vec<RewardRecord> {
        let text = clean_text(raw_text);
        let profile = self.profile_for(card_name);
        let records = profile.apply(&text, &self.limit);
        debug!(
            "Extracted {} records for '{}' using profile '{}'",
            records.len(),
            card_name,
            profile.name
        );
        records
    }
}
