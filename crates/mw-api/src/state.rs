//! Shared application state for the Axum server.

use std::sync::Arc;

use crate::analysis::{AnalysisConfig, DietaryAnalysisService};
use crate::cache::{AnalysisCache, CacheResult};
use crate::config::ApiConfig;
use crate::inference::ChatModel;
use crate::interpret::PreferenceInterpreter;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The analysis cache, shared with the analysis service.
    pub cache: Arc<AnalysisCache>,
    /// Cache-first batch analyzer.
    pub analysis: Arc<DietaryAnalysisService>,
    /// Free-text preference interpreter.
    pub interpreter: Arc<PreferenceInterpreter>,
}

impl AppState {
    /// Wire the services around one cache and one chat model.
    pub fn new(cache: Arc<AnalysisCache>, model: Arc<dyn ChatModel>, config: &ApiConfig) -> Self {
        let analysis = DietaryAnalysisService::new(
            cache.clone(),
            model.clone(),
            AnalysisConfig {
                max_batch_size: config.max_batch_size,
                call_timeout: config.call_timeout(),
            },
        );
        let interpreter = PreferenceInterpreter::new(model, config.call_timeout());

        Self {
            cache,
            analysis: Arc::new(analysis),
            interpreter: Arc::new(interpreter),
        }
    }

    /// State over an empty in-memory cache (tests and development).
    pub async fn in_memory(model: Arc<dyn ChatModel>) -> CacheResult<Self> {
        let cache = Arc::new(AnalysisCache::in_memory().await?);
        Ok(Self::new(cache, model, &ApiConfig::default()))
    }
}
