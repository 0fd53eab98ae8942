//! Quick-filter toggling and canonical preference phrases.
//!
//! The browsing UI keeps `Option<DietaryPreferences>`: `None` means "no
//! filter". Quick filters merge into it and unmerge out of it, and the
//! active set is mirrored into the text box as canonical phrases joined by
//! " and ". [`parse_phrases`] reads that text back without a model call.

use mw_protocol::{DietaryPreferences, PreferenceField, QuickFilter};

const PHRASE_SEPARATOR: &str = " and ";

/// Canonical phrase for a preference field.
pub fn phrase(field: PreferenceField) -> &'static str {
    match field {
        PreferenceField::OnlyVegetarian => "show me vegetarian dishes",
        PreferenceField::OnlyVegan => "show me vegan dishes",
        PreferenceField::OnlyMeat => "show me dishes with meat",
        PreferenceField::OnlyChicken => "show me chicken dishes",
        PreferenceField::OnlyFishSeafood => "show me seafood dishes",
        PreferenceField::ExcludeMeat => "exclude meat dishes",
        PreferenceField::ExcludeChicken => "exclude chicken dishes",
        PreferenceField::ExcludeFishSeafood => "exclude seafood dishes",
        PreferenceField::ExcludeGluten => "exclude gluten",
    }
}

/// Whether a quick filter is currently on.
pub fn is_active(current: Option<&DietaryPreferences>, filter: QuickFilter) -> bool {
    current.is_some_and(|prefs| filter.field().get(prefs))
}

/// Flip a quick filter.
///
/// Activating merges its field into the current preferences. Deactivating
/// clears only its field and collapses to `None` once nothing is left.
pub fn toggle(
    current: Option<DietaryPreferences>,
    filter: QuickFilter,
) -> Option<DietaryPreferences> {
    if is_active(current.as_ref(), filter) {
        let mut prefs = current.unwrap_or_default();
        filter.field().set(&mut prefs, false);
        (!prefs.is_empty()).then_some(prefs)
    } else {
        Some(current.unwrap_or_default().merge(&filter.preferences()))
    }
}

/// Render active preferences as canonical phrases joined by " and ".
pub fn describe(prefs: &DietaryPreferences) -> String {
    prefs
        .active_fields()
        .map(phrase)
        .collect::<Vec<_>>()
        .join(PHRASE_SEPARATOR)
}

/// Inverse of [`describe`]: map a message made only of canonical phrases
/// back to preferences.
///
/// Returns `None` as soon as any part is not a known phrase, so free text
/// always goes to the model.
pub fn parse_phrases(message: &str) -> Option<DietaryPreferences> {
    let lower = message.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    let mut prefs = DietaryPreferences::default();
    for part in lower.split(PHRASE_SEPARATOR) {
        let part = part.trim().trim_end_matches(['.', '!']);
        let field = PreferenceField::ALL
            .into_iter()
            .find(|f| phrase(*f) == part)?;
        field.set(&mut prefs, true);
    }
    Some(prefs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_two_then_deactivate_one() {
        let prefs = toggle(None, QuickFilter::Vegetarian);
        let prefs = toggle(prefs, QuickFilter::GlutenFree);
        assert_eq!(
            prefs,
            Some(DietaryPreferences {
                only_vegetarian: true,
                exclude_gluten: true,
                ..Default::default()
            })
        );

        let prefs = toggle(prefs, QuickFilter::Vegetarian);
        assert_eq!(
            prefs,
            Some(DietaryPreferences {
                exclude_gluten: true,
                ..Default::default()
            })
        );
    }

    #[test]
    fn deactivating_last_filter_collapses_to_none() {
        let prefs = toggle(None, QuickFilter::Vegan);
        assert!(is_active(prefs.as_ref(), QuickFilter::Vegan));
        assert_eq!(toggle(prefs, QuickFilter::Vegan), None);
    }

    #[test]
    fn toggle_keeps_fields_from_free_text() {
        let from_model = DietaryPreferences {
            exclude_chicken: true,
            ..Default::default()
        };
        let prefs = toggle(Some(from_model), QuickFilter::SeafoodOnly);
        let prefs = toggle(prefs, QuickFilter::SeafoodOnly);
        assert_eq!(prefs, Some(from_model));
    }

    #[test]
    fn nothing_is_active_without_preferences() {
        for filter in QuickFilter::ALL {
            assert!(!is_active(None, filter));
        }
    }

    #[test]
    fn describe_joins_phrases() {
        let prefs = DietaryPreferences {
            only_vegetarian: true,
            exclude_gluten: true,
            ..Default::default()
        };
        assert_eq!(describe(&prefs), "show me vegetarian dishes and exclude gluten");
        assert_eq!(describe(&DietaryPreferences::default()), "");
    }

    #[test]
    fn parse_phrases_inverts_describe() {
        for field in PreferenceField::ALL {
            let prefs = DietaryPreferences::only(field);
            assert_eq!(parse_phrases(&describe(&prefs)), Some(prefs));
        }
        let combined = DietaryPreferences {
            only_chicken: true,
            exclude_meat: true,
            ..Default::default()
        };
        assert_eq!(parse_phrases(&describe(&combined)), Some(combined));
    }

    #[test]
    fn parse_phrases_is_case_insensitive() {
        let prefs = parse_phrases("Show me vegan dishes").unwrap();
        assert!(prefs.only_vegan);
        assert_eq!(prefs.active_fields().count(), 1);
    }

    #[test]
    fn free_text_is_not_a_phrase() {
        assert_eq!(parse_phrases("I'm allergic to shellfish"), None);
        assert_eq!(parse_phrases("show me vegan dishes and something spicy"), None);
        assert_eq!(parse_phrases("   "), None);
    }
}
