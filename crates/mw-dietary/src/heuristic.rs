//! Keyword heuristic — best-effort dietary analysis with no model call.
//!
//! Matches lower-cased item text against fixed English, Arabic and Hebrew
//! keyword lists. Conservative: an item is only vegetarian when a marker
//! says so and no animal keyword matched.

use mw_protocol::{DietaryAnalysis, Dish};

const MEAT_KEYWORDS: &[&str] = &[
    "beef", "lamb", "pork", "meat", "steak", "kebab", "shawarma", "لحم", "بقر", "خروف", "كفتة",
    "كباب", "كفته", "بوفتيك", "ريش", "مفروم", "בשר", "בקר", "טומהוק", "لحمه", "لحمة",
];

const CHICKEN_KEYWORDS: &[&str] = &["chicken", "دجاج", "עוף", "poultry", "schnitzel"];

const SEAFOOD_KEYWORDS: &[&str] = &[
    "fish", "salmon", "tuna", "shrimp", "seafood", "سمك", "جمبري", "דג", "סלמון",
];

const GLUTEN_KEYWORDS: &[&str] = &[
    "bread", "pasta", "wheat", "flour", "خبز", "معكرونة", "לחם", "פסטה",
];

const VEGETARIAN_MARKERS: &[&str] = &[
    "vegetarian",
    "vegan",
    "vegetables",
    "نباتي",
    "צמחוני",
    "טבעוני",
];

const DAIRY_KEYWORDS: &[&str] = &[
    "cheese", "milk", "cream", "butter", "جبن", "حليب", "גבינה", "חלב",
];

/// Raw keyword hits per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub meat: bool,
    pub chicken: bool,
    pub seafood: bool,
    /// Gluten staples (bread, pasta, ...). Reported only; see [`classify`].
    pub gluten: bool,
    pub vegetarian_marker: bool,
    pub dairy: bool,
}

/// Scan an item's name and description for keyword hits.
pub fn scan(item: &impl Dish) -> KeywordHits {
    let text = format!("{} {}", item.name(), item.description()).to_lowercase();
    let text = text.as_str();

    KeywordHits {
        meat: matches_any(text, MEAT_KEYWORDS),
        chicken: matches_any(text, CHICKEN_KEYWORDS),
        seafood: matches_any(text, SEAFOOD_KEYWORDS),
        gluten: matches_any(text, GLUTEN_KEYWORDS),
        vegetarian_marker: matches_any(text, VEGETARIAN_MARKERS),
        dairy: matches_any(text, DAIRY_KEYWORDS),
    }
}

/// Classify an item from keywords alone. Total and pure.
///
/// `gluten_free` is never set: absence of a gluten keyword says nothing
/// about the kitchen, so the heuristic always assumes gluten is present.
pub fn classify(item: &impl Dish) -> DietaryAnalysis {
    let hits = scan(item);
    let animal = hits.meat || hits.chicken || hits.seafood;
    let is_vegetarian = !animal && hits.vegetarian_marker;

    DietaryAnalysis {
        contains_meat: hits.meat,
        contains_chicken: hits.chicken,
        contains_fish_seafood: hits.seafood,
        gluten_free: false,
        is_vegetarian,
        is_vegan: is_vegetarian && !hits.dairy,
    }
}

/// Check if the text contains any of the given patterns.
fn matches_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}
