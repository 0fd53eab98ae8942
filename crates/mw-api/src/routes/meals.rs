//! Batch meal analysis endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use mw_protocol::{AnalyzeMealsRequest, AnalyzeMealsResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /api/ai-analyze-meals — classify a batch of menu items.
pub async fn analyze_meals(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeMealsRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeMealsResponse>> {
    let Json(req) = body?;

    if req.meals.is_empty() {
        return Err(ApiError::BadRequest("meals (array) is required".into()));
    }
    if let Some(index) = req.meals.iter().position(|m| m.name.trim().is_empty()) {
        return Err(ApiError::BadRequest(format!("meals[{index}].name is required")));
    }

    let analysis = state.analysis.analyze_batch(&req.meals).await.map_err(|e| {
        tracing::error!(error = %e, item_count = req.meals.len(), "meal analysis failed");
        ApiError::from(e)
    })?;

    Ok(Json(AnalyzeMealsResponse { analysis }))
}
