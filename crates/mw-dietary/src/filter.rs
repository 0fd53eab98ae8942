//! Item filter — applies structured dietary preferences to a dish list.
//!
//! Exclusions are conjunctive vetoes; inclusions are a disjunctive
//! whitelist that only applies when at least one inclusion is set.

use mw_protocol::{DietaryAnalysis, DietaryPreferences, Dish};

use crate::heuristic;

/// Read-only source of previously computed analyses.
pub trait AnalysisLookup {
    /// Analysis for the dish, if one is known.
    fn lookup(&self, dish: &dyn Dish) -> Option<DietaryAnalysis>;
}

/// A lookup that knows nothing; every dish falls back to the heuristic.
pub struct NoLookup;

impl AnalysisLookup for NoLookup {
    fn lookup(&self, _dish: &dyn Dish) -> Option<DietaryAnalysis> {
        None
    }
}

impl<L: AnalysisLookup + ?Sized> AnalysisLookup for &L {
    fn lookup(&self, dish: &dyn Dish) -> Option<DietaryAnalysis> {
        (**self).lookup(dish)
    }
}

/// Keep the dishes that satisfy `preferences`.
///
/// `None` means no filter and returns `items` unchanged. Dishes without a
/// known analysis are judged by the keyword heuristic; that fallback is
/// never written back anywhere.
pub fn filter<T, L>(items: Vec<T>, preferences: Option<&DietaryPreferences>, lookup: &L) -> Vec<T>
where
    T: Dish,
    L: AnalysisLookup + ?Sized,
{
    let Some(prefs) = preferences else {
        return items;
    };

    let before = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter(|item| {
            let analysis = lookup
                .lookup(item)
                .unwrap_or_else(|| heuristic::classify(item));
            matches(&analysis, prefs)
        })
        .collect();

    tracing::debug!(before, after = kept.len(), "applied dietary filter");
    kept
}

/// Whether a single analysis passes the preferences.
pub fn matches(analysis: &DietaryAnalysis, prefs: &DietaryPreferences) -> bool {
    if prefs.exclude_meat && analysis.contains_meat {
        return false;
    }
    if prefs.exclude_chicken && analysis.contains_chicken {
        return false;
    }
    if prefs.exclude_fish_seafood && analysis.contains_fish_seafood {
        return false;
    }
    if prefs.exclude_gluten && !analysis.gluten_free {
        return false;
    }

    let inclusions = [
        (prefs.only_vegetarian, analysis.is_vegetarian),
        (prefs.only_vegan, analysis.is_vegan),
        (prefs.only_meat, analysis.contains_meat),
        (prefs.only_chicken, analysis.contains_chicken),
        (prefs.only_fish_seafood, analysis.contains_fish_seafood),
    ];

    let mut requested = inclusions.iter().filter(|(wanted, _)| *wanted).peekable();
    if requested.peek().is_none() {
        return true;
    }
    requested.any(|(_, present)| *present)
}
