//! E2E tests for batch meal analysis through the API router.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;

use helpers::{TestHarness, analysis_reply, chicken, seafood, vegan, vegetarian};
use mw_api::inference::{AiError, MockChatModel};
use mw_protocol::DietaryAnalysis;

/// Fifteen unknown items: the first ten are analyzed in one call, the rest
/// come back unknown.
#[tokio::test]
async fn e2e_batch_cap_leaves_overflow_unknown() {
    let h = TestHarness::new().await;
    h.model.push_reply(analysis_reply(&[vegetarian(); 10]));

    let names: Vec<String> = (1..=15).map(|i| format!("Dish {i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (status, json) = h.analyze(&refs).await;

    assert_eq!(status, StatusCode::OK);
    let analysis = json["analysis"].as_array().unwrap();
    assert_eq!(analysis.len(), 15);
    assert!(analysis[..10].iter().all(|a| a["isVegetarian"] == true));
    assert!(analysis[10..].iter().all(|a| a.is_null()));

    let prompt = &h.model.requests()[0].user;
    assert!(prompt.contains("\"Dish 10\""));
    assert!(!prompt.contains("\"Dish 11\""));
    assert_eq!(h.state.cache.len(), 10);
}

/// Re-submitting an analyzed batch is answered from the cache.
#[tokio::test]
async fn e2e_second_batch_is_served_from_cache() {
    let h = TestHarness::new().await;
    h.model.push_reply(analysis_reply(&[chicken(), seafood()]));

    let (_, first) = h.analyze(&["Chicken Shawarma", "Grilled Salmon"]).await;
    let (status, second) = h.analyze(&["chicken shawarma", "  GRILLED SALMON "]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(h.model.call_count(), 1);
}

/// Cached and fresh items interleave in input order.
#[tokio::test]
async fn e2e_mixed_batch_keeps_positions() {
    let h = TestHarness::new().await;
    h.model.push_reply(analysis_reply(&[vegan()]));
    h.model.push_reply(analysis_reply(&[chicken(), seafood()]));

    h.analyze(&["Falafel"]).await;
    let (status, json) = h
        .analyze(&["Chicken Wings", "Falafel", "Shrimp Tacos", "Falafel"])
        .await;

    assert_eq!(status, StatusCode::OK);
    let analyses: Vec<Option<DietaryAnalysis>> =
        serde_json::from_value(json["analysis"].clone()).unwrap();
    assert_eq!(
        analyses,
        vec![Some(chicken()), Some(vegan()), Some(seafood()), Some(vegan())]
    );

    // Only the two unknown names were sent.
    let prompt = &h.model.requests()[1].user;
    assert!(prompt.contains("Analyze the following 2 menu items"));
}

/// Concurrent requests for the same unknown name make one model call.
#[tokio::test]
async fn e2e_concurrent_requests_share_one_call() {
    let model = Arc::new(MockChatModel::new().with_delay(Duration::from_millis(200)));
    model.push_reply(analysis_reply(&[vegan()]));
    let h = TestHarness::with_model(model).await;

    let (a, b, c) = tokio::join!(
        h.analyze(&["Mujaddara"]),
        h.analyze(&["Mujaddara"]),
        h.analyze(&["mujaddara"]),
    );

    for (status, json) in [a, b, c] {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["analysis"][0]["isVegan"], true);
    }
    assert_eq!(h.model.call_count(), 1);
}

/// When the shared call fails, the leader reports the error and waiters
/// get unknown instead of calling again.
#[tokio::test]
async fn e2e_failed_leader_leaves_waiters_unknown() {
    let model = Arc::new(MockChatModel::new().with_delay(Duration::from_millis(200)));
    model.push_error(AiError::Status {
        status: 503,
        body: "overloaded".into(),
    });
    let h = TestHarness::with_model(model).await;

    let leader = h.analyze(&["Moussaka"]);
    let waiter = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.analyze(&["Moussaka"]).await
    };
    let ((leader_status, _), (waiter_status, waiter_json)) = tokio::join!(leader, waiter);

    assert_eq!(leader_status, StatusCode::BAD_GATEWAY);
    assert_eq!(waiter_status, StatusCode::OK);
    assert!(waiter_json["analysis"][0].is_null());
    assert_eq!(h.model.call_count(), 1);
    assert!(h.state.cache.is_empty());
}

/// An unparseable reply writes nothing; a later retry can still succeed.
#[tokio::test]
async fn e2e_malformed_reply_then_retry() {
    let h = TestHarness::new().await;
    h.model.push_reply("I'm sorry, I can't help with that.");
    h.model.push_reply(analysis_reply(&[vegan()]));

    let (status, json) = h.analyze(&["Tabbouleh"]).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "AI error");
    assert!(json["details"].as_str().unwrap().contains("malformed"));
    assert!(h.state.cache.is_empty());

    let (status, json) = h.analyze(&["Tabbouleh"]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["analysis"][0]["isVegan"], true);
}

/// Validation failures never reach the model.
#[tokio::test]
async fn e2e_validation_errors_skip_model() {
    let h = TestHarness::new().await;

    let (status, _) = h.analyze(&[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = h
        .post(
            mw_protocol::ANALYZE_MEALS_PATH,
            serde_json::json!({"meals": "not an array"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    assert_eq!(h.model.call_count(), 0);
}
