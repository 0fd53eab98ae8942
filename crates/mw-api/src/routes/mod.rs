//! API route definitions and router builder.

pub mod cache;
pub mod health;
pub mod meals;
pub mod preferences;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use mw_protocol::{ANALYZE_MEALS_PATH, CACHE_DOCUMENT_PATH, DIETARY_FILTER_PATH};

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
///
/// An empty `cors_origins` allows any origin.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(ANALYZE_MEALS_PATH, post(meals::analyze_meals))
        .route(DIETARY_FILTER_PATH, post(preferences::dietary_filter))
        .route(CACHE_DOCUMENT_PATH, get(cache::cache_document))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
