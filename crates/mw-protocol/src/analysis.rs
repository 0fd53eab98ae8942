use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::menu::MenuItem;

/// Six-boolean dietary classification of a menu item.
///
/// Field names on the wire match the cache document format, including the
/// historical `notcontainsGluten` spelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DietaryAnalysis {
    #[serde(rename = "containsMeat")]
    pub contains_meat: bool,
    #[serde(rename = "containsChicken")]
    pub contains_chicken: bool,
    #[serde(rename = "containsFishSeafood")]
    pub contains_fish_seafood: bool,
    /// True only when the item is known to be gluten free.
    #[serde(rename = "notcontainsGluten")]
    pub gluten_free: bool,
    #[serde(rename = "isVegetarian")]
    pub is_vegetarian: bool,
    #[serde(rename = "isVegan")]
    pub is_vegan: bool,
}

impl DietaryAnalysis {
    /// Whether any animal flesh was detected.
    pub fn has_animal_protein(&self) -> bool {
        self.contains_meat || self.contains_chicken || self.contains_fish_seafood
    }

    /// Checks `vegan ⇒ vegetarian` and `vegetarian ⇒ no meat, chicken or fish`.
    ///
    /// Model output is not forced through this, only reported.
    pub fn is_consistent(&self) -> bool {
        (!self.is_vegan || self.is_vegetarian) && (!self.is_vegetarian || !self.has_animal_protein())
    }
}

/// One persisted analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub analysis: DietaryAnalysis,
    /// When the analysis was produced. Older documents omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    pub fn new(item: &MenuItem, analysis: DietaryAnalysis) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            analysis,
            analyzed_at: Some(Utc::now()),
        }
    }
}

/// The whole persisted cache: `{ "meals": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheDocument {
    #[serde(default)]
    pub meals: Vec<CacheEntry>,
}

/// An entry skipped while reading a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Zero-based position in `meals`.
    pub position: usize,
    /// The entry's `name`, when it has one.
    pub name: Option<String>,
    pub reason: String,
}

impl CacheDocument {
    /// Parse a stored document entry by entry.
    ///
    /// Entries without a complete analysis (older writers stored whatever
    /// the model returned, or nothing) are skipped and reported. Invalid
    /// JSON, or a `meals` that is not an array, is still an error.
    pub fn from_slice_lenient(bytes: &[u8]) -> serde_json::Result<(Self, Vec<RejectedEntry>)> {
        #[derive(Deserialize)]
        struct RawDocument {
            #[serde(default)]
            meals: Vec<serde_json::Value>,
        }

        let raw: RawDocument = serde_json::from_slice(bytes)?;
        let mut meals = Vec::with_capacity(raw.meals.len());
        let mut rejected = Vec::new();

        for (position, value) in raw.meals.into_iter().enumerate() {
            let name = value
                .get("name")
                .and_then(|n| n.as_str())
                .map(String::from);
            match serde_json::from_value::<CacheEntry>(value) {
                Ok(entry) => meals.push(entry),
                Err(e) => rejected.push(RejectedEntry {
                    position,
                    name,
                    reason: e.to_string(),
                }),
            }
        }

        Ok((Self { meals }, rejected))
    }
}
