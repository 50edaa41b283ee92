//! Category standardization for reward phrases
//!
//! Card pages describe spending categories in free text ("Grocery Stores",
//! "dining at restaurants", "hotels and rental cars booked through Capital One
//! Travel"). Everything is folded into the fixed [`Category`] set so rewards
//! from different issuers can be compared.

use crate::models::Category;

/// Map a free-text category phrase to a standardized category
///
/// Matching is case-insensitive substring matching, first rule wins. Order
/// matters: "food" only counts as dining when it isn't grocery-related, and
/// "capital one hotel" must be seen before plain "hotel".
pub fn normalize(text: &str) -> Category {
    let cat = text.trim().to_lowercase();

    if cat.is_empty() {
        return Category::OtherPurchases;
    }

    // Non-specific "all purchases" tiers
    if cat == "all purchases" || cat == "all" {
        return Category::OtherPurchases;
    }

    // "grocery" and "groceries"
    if cat.contains("grocer") {
        return Category::Groceries;
    }

    if cat.contains("online retail") || (cat.contains("online") && cat.contains("retail")) {
        return Category::OnlineRetail;
    }

    if cat.contains("gas") || cat.contains("fuel") {
        return Category::Gas;
    }

    if cat.contains("streaming") {
        return Category::Streaming;
    }

    if cat.contains("transit") {
        return Category::Transit;
    }

    // Dining, restaurants, food ordering
    if cat.contains("restaurant")
        || cat.contains("dine")
        || (cat.contains("food") && !cat.contains("grocer"))
    {
        return Category::FoodServices;
    }

    if cat.contains("capital one hotel") {
        return Category::CapitalOneHotels;
    }

    if cat.contains("hotel") {
        return Category::Hotels;
    }

    if cat.contains("wholesale") || cat.contains("club") {
        return Category::WholesaleClubs;
    }

    if cat.contains("drugstore") || cat.contains("pharmacy") {
        return Category::Drugstore;
    }

    Category::OtherPurchases
}
