//! Shared test harness for E2E integration tests.
//!
//! Wires the real API router over an in-memory or file-backed cache with
//! a scripted chat model, and can serve it on a loopback port for the
//! client crate.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use mw_api::cache::{AnalysisCache, CacheStorage};
use mw_api::config::ApiConfig;
use mw_api::inference::{ChatModel, MockChatModel};
use mw_api::routes::build_router;
use mw_api::state::AppState;
use mw_protocol::{
    ANALYZE_MEALS_PATH, CACHE_DOCUMENT_PATH, DIETARY_FILTER_PATH, DietaryAnalysis,
};

/// End-to-end harness around one API instance.
pub struct TestHarness {
    /// Application state (cache, analysis service, interpreter).
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
    /// Scripted chat model behind both services.
    pub model: Arc<MockChatModel>,
}

impl TestHarness {
    /// In-memory cache, default config.
    pub async fn new() -> Self {
        Self::with_model(Arc::new(MockChatModel::new())).await
    }

    pub async fn with_model(model: Arc<MockChatModel>) -> Self {
        let cache = Arc::new(AnalysisCache::in_memory().await.unwrap());
        Self::build(cache, model)
    }

    /// Cache backed by the given storage (e.g. a `FileStorage` in a temp dir).
    pub async fn with_storage(storage: Arc<dyn CacheStorage>) -> Self {
        let cache = Arc::new(AnalysisCache::load(storage).await.unwrap());
        Self::build(cache, Arc::new(MockChatModel::new()))
    }

    fn build(cache: Arc<AnalysisCache>, model: Arc<MockChatModel>) -> Self {
        let state = AppState::new(cache, model.clone(), &ApiConfig::default());
        let router = build_router(state.clone(), &[]);
        Self {
            state,
            router,
            model,
        }
    }

    /// POST /api/ai-analyze-meals with `{"meals": [{"name": ...}, ...]}`.
    pub async fn analyze(&self, names: &[&str]) -> (StatusCode, serde_json::Value) {
        let meals: Vec<serde_json::Value> = names
            .iter()
            .map(|name| serde_json::json!({ "name": name }))
            .collect();
        self.post(ANALYZE_MEALS_PATH, serde_json::json!({ "meals": meals }))
            .await
    }

    /// POST /api/ai-dietary-filter.
    pub async fn dietary_filter(&self, message: &str) -> (StatusCode, serde_json::Value) {
        self.post(DIETARY_FILTER_PATH, serde_json::json!({ "userMessage": message }))
            .await
    }

    /// GET the published cache document.
    pub async fn cache_document(&self) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(CACHE_DOCUMENT_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        read(response).await
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        read(response).await
    }
}

async fn read(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// Serve a router on a loopback port. Returns the base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Build the state and router around any chat model (e.g. a real
/// `OpenAiClient` pointed at wiremock).
pub async fn router_with_model(model: Arc<dyn ChatModel>) -> (AppState, Router) {
    let cache = Arc::new(AnalysisCache::in_memory().await.unwrap());
    let state = AppState::new(cache, model, &ApiConfig::default());
    let router = build_router(state.clone(), &[]);
    (state, router)
}

/// A model reply for the given analyses, wrapped in chatter the way real
/// models tend to answer.
pub fn analysis_reply(analyses: &[DietaryAnalysis]) -> String {
    format!(
        "Here is the analysis:\n```json\n{}\n```",
        serde_json::to_string(analyses).unwrap()
    )
}

pub fn vegan() -> DietaryAnalysis {
    DietaryAnalysis {
        is_vegetarian: true,
        is_vegan: true,
        ..Default::default()
    }
}

pub fn vegetarian() -> DietaryAnalysis {
    DietaryAnalysis {
        is_vegetarian: true,
        ..Default::default()
    }
}

pub fn chicken() -> DietaryAnalysis {
    DietaryAnalysis {
        contains_meat: true,
        contains_chicken: true,
        ..Default::default()
    }
}

pub fn seafood() -> DietaryAnalysis {
    DietaryAnalysis {
        contains_fish_seafood: true,
        gluten_free: true,
        ..Default::default()
    }
}
