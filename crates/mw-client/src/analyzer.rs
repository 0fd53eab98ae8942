//! Menu analyzer: local analysis map in front of the API.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde::Serialize;
use serde::de::DeserializeOwned;

use mw_dietary::{AnalysisLookup, DietaryTag};
use mw_protocol::{
    ANALYZE_MEALS_PATH, AnalyzeMealsRequest, AnalyzeMealsResponse, CACHE_DOCUMENT_PATH,
    CacheDocument, DIETARY_FILTER_PATH, DietaryAnalysis, DietaryFilterRequest,
    DietaryFilterResponse, DietaryPreferences, Dish, MenuItem,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

pub struct MenuAnalyzer {
    http: reqwest::Client,
    config: ClientConfig,
    analyses: RwLock<HashMap<String, DietaryAnalysis>>,
}

impl MenuAnalyzer {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            config,
            analyses: RwLock::new(HashMap::new()),
        })
    }

    /// Number of dishes with a known analysis.
    pub fn known(&self) -> usize {
        self.analyses.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Analysis already held locally for this dish.
    pub fn cached(&self, dish: &dyn Dish) -> Option<DietaryAnalysis> {
        self.analyses
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&dish.cache_key())
            .copied()
    }

    /// Load entries from a cache document. Existing entries win, as does
    /// the first entry for a repeated name. Returns how many were added.
    pub fn seed(&self, document: &CacheDocument) -> usize {
        let mut analyses = self.analyses.write().unwrap_or_else(|e| e.into_inner());
        document
            .meals
            .iter()
            .filter(|entry| {
                let key = mw_protocol::normalize_name(&entry.name);
                match analyses.entry(key) {
                    Entry::Occupied(_) => false,
                    Entry::Vacant(slot) => {
                        slot.insert(entry.analysis);
                        true
                    }
                }
            })
            .count()
    }

    /// Seed from the server's published cache document. Failures are
    /// logged and leave the analyzer as it was.
    pub async fn seed_from_server(&self) -> usize {
        match self.fetch_cache_document().await {
            Ok(document) => {
                let added = self.seed(&document);
                tracing::info!(added, total = document.meals.len(), "seeded analyses from server");
                added
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load server cache document");
                0
            }
        }
    }

    /// Ask the API about every dish not yet known, in batches of
    /// `batch_size`. Failed batches are logged and skipped; those dishes
    /// fall back to the heuristic in [`MenuAnalyzer::analysis_for`].
    pub async fn analyze_items<T: Dish>(&self, items: &[T]) {
        let mut seen = HashSet::new();
        let pending: Vec<MenuItem> = items
            .iter()
            .filter(|item| !item.name().trim().is_empty())
            .filter(|item| self.cached(*item).is_none())
            .filter(|item| seen.insert(item.cache_key()))
            .map(|item| MenuItem::with_description(item.name(), item.description()))
            .collect();

        if pending.is_empty() {
            return;
        }

        tracing::debug!(to_analyze = pending.len(), "requesting analyses");
        for chunk in pending.chunks(self.config.batch_size.max(1)) {
            match self.fetch_analyses(chunk).await {
                Ok(results) => self.store(chunk, results),
                Err(e) => {
                    tracing::warn!(error = %e, item_count = chunk.len(), "meal analysis request failed");
                }
            }
        }
    }

    /// Best available analysis: local, then the API, then the keyword
    /// heuristic.
    pub async fn analysis_for<T: Dish>(&self, item: &T) -> DietaryAnalysis {
        if let Some(analysis) = self.cached(item) {
            return analysis;
        }
        self.analyze_items(std::slice::from_ref(item)).await;
        self.cached(item)
            .unwrap_or_else(|| mw_dietary::classify(item))
    }

    pub async fn tags_for<T: Dish>(&self, item: &T) -> Vec<DietaryTag> {
        mw_dietary::tags_for(&self.analysis_for(item).await)
    }

    /// Filter with locally known analyses, heuristic for the rest.
    pub fn filter_items<T: Dish>(
        &self,
        items: Vec<T>,
        preferences: Option<&DietaryPreferences>,
    ) -> Vec<T> {
        mw_dietary::filter(items, preferences, self)
    }

    /// Interpret a free-text request. Any failure means no filter.
    pub async fn interpret(&self, message: &str) -> DietaryPreferences {
        match self.fetch_preferences(message).await {
            Ok(preferences) => preferences,
            Err(e) => {
                tracing::warn!(error = %e, "dietary filter request failed, applying no filter");
                DietaryPreferences::default()
            }
        }
    }

    /// The server's published cache. Entries without a complete analysis
    /// are skipped with a warning; the rest still load.
    pub async fn fetch_cache_document(&self) -> ClientResult<CacheDocument> {
        let response = self
            .http
            .get(self.config.url(CACHE_DOCUMENT_PATH))
            .send()
            .await?;
        let bytes = success(response).await?.bytes().await?;
        let (document, rejected) = CacheDocument::from_slice_lenient(&bytes)?;
        for entry in &rejected {
            tracing::warn!(
                position = entry.position,
                name = entry.name.as_deref().unwrap_or("<unnamed>"),
                reason = %entry.reason,
                "skipping published cache entry"
            );
        }
        Ok(document)
    }

    /// One analyze request, aligned with `items`.
    pub async fn fetch_analyses(
        &self,
        items: &[MenuItem],
    ) -> ClientResult<Vec<Option<DietaryAnalysis>>> {
        let request = AnalyzeMealsRequest {
            meals: items.to_vec(),
        };
        let response: AnalyzeMealsResponse = self.post(ANALYZE_MEALS_PATH, &request).await?;
        if response.analysis.len() != items.len() {
            return Err(ClientError::Misaligned {
                expected: items.len(),
                got: response.analysis.len(),
            });
        }
        Ok(response.analysis)
    }

    pub async fn fetch_preferences(&self, message: &str) -> ClientResult<DietaryPreferences> {
        let request = DietaryFilterRequest {
            user_message: message.to_string(),
        };
        let response: DietaryFilterResponse = self.post(DIETARY_FILTER_PATH, &request).await?;
        Ok(response.preferences)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<R> {
        let response = self
            .http
            .post(self.config.url(path))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    fn store(&self, items: &[MenuItem], results: Vec<Option<DietaryAnalysis>>) {
        let mut analyses = self.analyses.write().unwrap_or_else(|e| e.into_inner());
        for (item, result) in items.iter().zip(results) {
            if let Some(analysis) = result {
                analyses.entry(item.cache_key()).or_insert(analysis);
            }
        }
    }
}

impl AnalysisLookup for MenuAnalyzer {
    fn lookup(&self, dish: &dyn Dish) -> Option<DietaryAnalysis> {
        self.cached(dish)
    }
}

async fn success(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> ClientResult<R> {
    Ok(success(response).await?.json().await?)
}
