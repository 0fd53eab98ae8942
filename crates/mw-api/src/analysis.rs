//! Dietary analysis service — cache-first batch classification.
//!
//! For each batch: cache hits are answered directly, names another request
//! is already asking the model about are awaited, and the remaining
//! distinct names (at most `max_batch_size`) go to the model in a single
//! prompt. Results are paired with the request by position, written to the
//! cache, and returned aligned with the input.
//!
//! The in-flight map guarantees at most one pending model call per
//! normalized name across concurrent batches.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;

use mw_protocol::{CacheEntry, DietaryAnalysis, Dish, MenuItem};

use crate::cache::{AnalysisCache, CacheError};
use crate::inference::{AiError, ChatModel, ChatRequest, complete_with_timeout, json};

/// Default cap on distinct uncached items per model call.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;

/// Errors from a batch analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("meals (array) is required")]
    EmptyBatch,

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("malformed AI response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Tunables for the service.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Distinct uncached names sent to the model per call.
    pub max_batch_size: usize,
    /// Deadline for one model call.
    pub call_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            call_timeout: Duration::from_secs(20),
        }
    }
}

/// Value published to waiters: `None` while pending, then `Some(result)`
/// where a `None` result means the leading call failed.
type Pending = Option<Option<DietaryAnalysis>>;

/// How one input position will be answered.
enum Slot {
    Ready(DietaryAnalysis),
    Fresh(String),
    Waiting(String),
    Skipped,
}

struct Plan {
    slots: Vec<Slot>,
    fresh: Vec<MenuItem>,
    senders: Vec<watch::Sender<Pending>>,
    waiting: HashMap<String, watch::Receiver<Pending>>,
}

/// Batch analyzer in front of the chat model.
pub struct DietaryAnalysisService {
    cache: Arc<AnalysisCache>,
    model: Arc<dyn ChatModel>,
    config: AnalysisConfig,
    inflight: Mutex<HashMap<String, watch::Receiver<Pending>>>,
}

impl DietaryAnalysisService {
    pub fn new(cache: Arc<AnalysisCache>, model: Arc<dyn ChatModel>, config: AnalysisConfig) -> Self {
        Self {
            cache,
            model,
            config,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<AnalysisCache> {
        &self.cache
    }

    pub fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }

    /// Analyze a batch, positionally aligned with `items`.
    ///
    /// `None` entries are unknown: over the batch cap, or waiting on a
    /// concurrent call that failed. Model and parse failures fail the
    /// whole call and leave the cache untouched.
    pub async fn analyze_batch(
        &self,
        items: &[MenuItem],
    ) -> Result<Vec<Option<DietaryAnalysis>>, AnalysisError> {
        if items.is_empty() {
            return Err(AnalysisError::EmptyBatch);
        }

        let Plan {
            slots,
            fresh,
            senders,
            waiting,
        } = self.plan(items);

        let skipped = slots.iter().filter(|s| matches!(s, Slot::Skipped)).count();
        tracing::info!(
            item_count = items.len(),
            to_analyze = fresh.len(),
            waiting = waiting.len(),
            skipped,
            "analyzing meal batch"
        );

        let mut results: HashMap<String, Option<DietaryAnalysis>> = HashMap::new();

        if !fresh.is_empty() {
            let keys: Vec<String> = fresh.iter().map(|i| i.cache_key()).collect();
            let leader = Leader {
                service: self,
                keys,
                senders,
            };
            let analyses = self.call_model(&fresh).await?;

            let entries = fresh
                .iter()
                .zip(&analyses)
                .map(|(item, analysis)| CacheEntry::new(item, *analysis))
                .collect();
            let persisted = self.cache.insert_many(entries).await;

            leader.publish(&analyses);
            persisted?;

            for (item, analysis) in fresh.iter().zip(analyses) {
                results.insert(item.cache_key(), Some(analysis));
            }
        }

        for (key, mut rx) in waiting {
            // A closed channel means the leader gave up without publishing.
            let outcome = rx
                .wait_for(|v| v.is_some())
                .await
                .map(|v| *v)
                .ok()
                .flatten()
                .flatten();
            if outcome.is_none() {
                tracing::debug!(name = %key, "concurrent analysis did not produce a result");
            }
            results.insert(key, outcome);
        }

        Ok(slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Ready(analysis) => Some(analysis),
                Slot::Fresh(key) | Slot::Waiting(key) => results.get(&key).copied().flatten(),
                Slot::Skipped => None,
            })
            .collect())
    }

    /// Partition the batch. Runs under the in-flight lock so a name is
    /// either cached, pending, or claimed by this call — never two leaders.
    fn plan(&self, items: &[MenuItem]) -> Plan {
        let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        let mut plan = Plan {
            slots: Vec::with_capacity(items.len()),
            fresh: Vec::new(),
            senders: Vec::new(),
            waiting: HashMap::new(),
        };
        let mut claimed = HashSet::new();

        for item in items {
            let key = item.cache_key();

            if let Some(analysis) = self.cache.get(&key) {
                plan.slots.push(Slot::Ready(analysis));
                continue;
            }

            match inflight.entry(key.clone()) {
                Entry::Occupied(pending) => {
                    if claimed.contains(&key) {
                        plan.slots.push(Slot::Fresh(key));
                    } else {
                        plan.waiting
                            .entry(key.clone())
                            .or_insert_with(|| pending.get().clone());
                        plan.slots.push(Slot::Waiting(key));
                    }
                }
                Entry::Vacant(vacant) => {
                    if plan.fresh.len() >= self.config.max_batch_size {
                        plan.slots.push(Slot::Skipped);
                        continue;
                    }
                    let (tx, rx) = watch::channel(None);
                    vacant.insert(rx);
                    claimed.insert(key.clone());
                    plan.senders.push(tx);
                    plan.fresh.push(item.clone());
                    plan.slots.push(Slot::Fresh(key));
                }
            }
        }

        plan
    }

    /// One model call for the given distinct items.
    async fn call_model(&self, items: &[MenuItem]) -> Result<Vec<DietaryAnalysis>, AnalysisError> {
        let request = ChatRequest::new(build_prompt(items));
        let reply =
            complete_with_timeout(self.model.as_ref(), &request, self.config.call_timeout)
                .await
                .inspect_err(|e| tracing::warn!(error = %e, "meal analysis call failed"))?;

        let analyses = parse_analyses(&reply, items.len()).inspect_err(|e| {
            tracing::warn!(error = %e, reply = %reply, "discarding malformed meal analysis reply");
        })?;

        for (item, analysis) in items.iter().zip(&analyses) {
            if !analysis.is_consistent() {
                tracing::warn!(name = %item.name, ?analysis, "model returned inconsistent analysis");
            }
        }
        Ok(analyses)
    }
}

/// Owns this call's in-flight claims. Dropping it releases them; waiters
/// that were not published to see the sender close and report unknown.
struct Leader<'a> {
    service: &'a DietaryAnalysisService,
    keys: Vec<String>,
    senders: Vec<watch::Sender<Pending>>,
}

impl Leader<'_> {
    fn publish(self, analyses: &[DietaryAnalysis]) {
        for (tx, analysis) in self.senders.iter().zip(analyses) {
            tx.send_replace(Some(Some(*analysis)));
        }
    }
}

impl Drop for Leader<'_> {
    fn drop(&mut self) {
        let mut inflight = self
            .service
            .inflight
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        for key in &self.keys {
            inflight.remove(key);
        }
    }
}

/// Numbered prompt asking for one JSON object per item, in order.
pub fn build_prompt(items: &[MenuItem]) -> String {
    let listing = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut line = format!("{}. Name: \"{}\"", i + 1, item.name.trim());
            let description = item.description.trim();
            if !description.is_empty() {
                line.push_str(&format!(", Description: \"{description}\""));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an AI food analyzer. For each of the following menu items, return a JSON array where each item has:
- name
- containsMeat (true/false)
- containsChicken (true/false)
- containsFishSeafood (true/false)
- notcontainsGluten (true/false)
- isVegetarian (true/false)
- isVegan (true/false)

Analyze the following {count} menu items (names and optional descriptions):

{listing}

Return exactly {count} objects in the same order as listed. Return only the JSON array, nothing else."#,
        count = items.len(),
    )
}

/// Parse and validate the model's array reply.
///
/// Requires exactly `expected` elements, each carrying all six booleans.
pub fn parse_analyses(reply: &str, expected: usize) -> Result<Vec<DietaryAnalysis>, AnalysisError> {
    let span = json::first_array(reply)
        .ok_or_else(|| AnalysisError::MalformedResponse("no JSON array in reply".into()))?;

    let values: Vec<serde_json::Value> = serde_json::from_str(span)
        .map_err(|e| AnalysisError::MalformedResponse(format!("invalid JSON array: {e}")))?;

    if values.len() != expected {
        return Err(AnalysisError::MalformedResponse(format!(
            "expected {expected} analyses, got {}",
            values.len()
        )));
    }

    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value::<DietaryAnalysis>(value).map_err(|e| {
                AnalysisError::MalformedResponse(format!("item {}: {e}", i + 1))
            })
        })
        .collect()
}
