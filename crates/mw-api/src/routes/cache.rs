//! Published cache document, read by clients to pre-seed their analyses.

use axum::Json;
use axum::extract::State;

use mw_protocol::CacheDocument;

use crate::state::AppState;

/// GET /restaurant/meal_analysis_cache.json — current cache snapshot.
pub async fn cache_document(State(state): State<AppState>) -> Json<CacheDocument> {
    Json(state.cache.snapshot())
}
