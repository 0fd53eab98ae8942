//! Dietary logic for Mealwise that needs no I/O.
//!
//! Provides the keyword heuristic used when no model analysis exists, the
//! item filter that applies structured preferences, quick-filter toggling
//! and phrase rendering, and the tag set shown next to each dish.

pub mod filter;
pub mod heuristic;
pub mod preferences;
pub mod tags;

pub use filter::{AnalysisLookup, NoLookup, filter, matches};
pub use heuristic::{KeywordHits, classify, scan};
pub use preferences::{describe, is_active, parse_phrases, toggle};
pub use tags::{DietaryTag, tags_for};
