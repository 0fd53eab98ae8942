//! HTTP request/response bodies shared by the server and the client.

use serde::{Deserialize, Serialize};

use crate::analysis::DietaryAnalysis;
use crate::menu::MenuItem;
use crate::preferences::DietaryPreferences;

/// Path of the batch analysis endpoint.
pub const ANALYZE_MEALS_PATH: &str = "/api/ai-analyze-meals";
/// Path of the preference interpretation endpoint.
pub const DIETARY_FILTER_PATH: &str = "/api/ai-dietary-filter";
/// Path of the published read-only cache document.
pub const CACHE_DOCUMENT_PATH: &str = "/restaurant/meal_analysis_cache.json";

/// Body of `POST /api/ai-analyze-meals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeMealsRequest {
    #[serde(default)]
    pub meals: Vec<MenuItem>,
}

/// Response of `POST /api/ai-analyze-meals`.
///
/// Aligned with the request; `null` marks an item that was not analyzed in
/// this call (over the batch cap) and may be re-submitted later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeMealsResponse {
    pub analysis: Vec<Option<DietaryAnalysis>>,
}

/// Body of `POST /api/ai-dietary-filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietaryFilterRequest {
    #[serde(default)]
    pub user_message: String,
}

/// Response of `POST /api/ai-dietary-filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietaryFilterResponse {
    #[serde(default)]
    pub preferences: DietaryPreferences,
}

/// Error body returned with any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub status: u16,
}
