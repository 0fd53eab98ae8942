//! Natural-language dietary filter endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use mw_protocol::{DietaryFilterRequest, DietaryFilterResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /api/ai-dietary-filter — turn a free-text request into preferences.
///
/// Always 200 for a non-blank message; interpretation failures come back
/// as neutral preferences.
pub async fn dietary_filter(
    State(state): State<AppState>,
    body: Result<Json<DietaryFilterRequest>, JsonRejection>,
) -> ApiResult<Json<DietaryFilterResponse>> {
    let Json(req) = body?;

    if req.user_message.trim().is_empty() {
        return Err(ApiError::BadRequest("userMessage is required".into()));
    }

    let result = state.interpreter.interpret(&req.user_message).await;
    tracing::info!(
        tier = result.tier.as_str(),
        active = result.preferences.active_fields().count(),
        "dietary preferences interpreted"
    );

    Ok(Json(DietaryFilterResponse {
        preferences: result.preferences,
    }))
}
