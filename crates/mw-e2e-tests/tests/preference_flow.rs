//! E2E tests for quick filters, phrase rendering and interpretation.

mod helpers;

use axum::http::StatusCode;

use helpers::TestHarness;
use mw_api::inference::AiError;
use mw_dietary::{describe, is_active, toggle};
use mw_protocol::{DietaryPreferences, MenuItem, QuickFilter};

/// Quick filters render to text that the API maps back without the model.
#[tokio::test]
async fn e2e_quick_filter_text_round_trips() {
    let h = TestHarness::new().await;

    let prefs = toggle(None, QuickFilter::Vegetarian);
    let prefs = toggle(prefs, QuickFilter::GlutenFree).unwrap();
    assert!(prefs.only_vegetarian && prefs.exclude_gluten);

    let (status, json) = h.dietary_filter(&describe(&prefs)).await;
    assert_eq!(status, StatusCode::OK);
    let parsed: DietaryPreferences = serde_json::from_value(json["preferences"].clone()).unwrap();
    assert_eq!(parsed, prefs);
    assert_eq!(h.model.call_count(), 0);
}

/// Deactivating one of two filters keeps the other; the last one clears.
#[test]
fn e2e_quick_filters_merge_and_unmerge() {
    let both = toggle(toggle(None, QuickFilter::Vegetarian), QuickFilter::GlutenFree);
    assert!(is_active(both.as_ref(), QuickFilter::Vegetarian));
    assert!(is_active(both.as_ref(), QuickFilter::GlutenFree));

    let only_gluten = toggle(both, QuickFilter::Vegetarian);
    assert!(!is_active(only_gluten.as_ref(), QuickFilter::Vegetarian));
    assert!(is_active(only_gluten.as_ref(), QuickFilter::GlutenFree));

    assert_eq!(toggle(only_gluten, QuickFilter::GlutenFree), None);
}

/// Free text goes to the model; its preferences drive the item filter.
#[tokio::test]
async fn e2e_free_text_filters_menu() {
    let h = TestHarness::new().await;
    h.model
        .push_reply(r#"{"excludeMeat": true, "excludeChicken": true, "excludeFishSeafood": false}"#);

    let (status, json) = h.dietary_filter("I don't eat any meat or poultry").await;
    assert_eq!(status, StatusCode::OK);
    let prefs: DietaryPreferences = serde_json::from_value(json["preferences"].clone()).unwrap();

    let menu = vec![
        MenuItem::new("Beef Burger"),
        MenuItem::new("Chicken Schnitzel"),
        MenuItem::new("Fish and Chips"),
        MenuItem::new("Greek Salad"),
    ];
    let kept = mw_dietary::filter(menu, Some(&prefs), &mw_dietary::NoLookup);
    let names: Vec<&str> = kept.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Fish and Chips", "Greek Salad"]);
}

/// Provider outage still answers 200 with no filter.
#[tokio::test]
async fn e2e_interpreter_outage_is_neutral() {
    let h = TestHarness::new().await;
    h.model.push_error(AiError::MissingCredential);

    let (status, json) = h.dietary_filter("something light").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["preferences"], serde_json::json!({}));
}
