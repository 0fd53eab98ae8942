//! Preference interpreter — free text to structured dietary preferences.
//!
//! Tries the canonical filter phrases first (zero cost, the text the UI
//! itself writes for active quick filters), then asks the chat model. Any
//! model failure yields neutral preferences: interpretation must never
//! block browsing.

use std::sync::Arc;
use std::time::Duration;

use mw_protocol::{DietaryPreferences, PreferenceField};

use crate::inference::{AiError, ChatModel, ChatRequest, complete_with_timeout, json};

/// Which tier produced an interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretTier {
    /// Matched canonical filter phrases locally.
    Phrases,
    /// Parsed from the model's reply.
    Model,
    /// Model unavailable or unparseable; neutral preferences.
    Fallback,
}

impl InterpretTier {
    pub fn as_str(self) -> &'static str {
        match self {
            InterpretTier::Phrases => "phrases",
            InterpretTier::Model => "model",
            InterpretTier::Fallback => "fallback",
        }
    }
}

/// Preferences plus the tier that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpretation {
    pub preferences: DietaryPreferences,
    pub tier: InterpretTier,
}

#[derive(Debug, thiserror::Error)]
enum InterpretError {
    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("malformed AI response: {0}")]
    Malformed(String),
}

pub struct PreferenceInterpreter {
    model: Arc<dyn ChatModel>,
    call_timeout: Duration,
}

impl PreferenceInterpreter {
    pub fn new(model: Arc<dyn ChatModel>, call_timeout: Duration) -> Self {
        Self {
            model,
            call_timeout,
        }
    }

    /// Interpret a message. Never fails.
    pub async fn interpret(&self, message: &str) -> Interpretation {
        if let Some(preferences) = mw_dietary::parse_phrases(message) {
            tracing::debug!("preferences matched canonical phrases");
            return Interpretation {
                preferences,
                tier: InterpretTier::Phrases,
            };
        }

        match self.ask_model(message).await {
            Ok(preferences) => Interpretation {
                preferences,
                tier: InterpretTier::Model,
            },
            Err(e) => {
                tracing::warn!(error = %e, "preference interpretation failed, applying no filter");
                Interpretation {
                    preferences: DietaryPreferences::default(),
                    tier: InterpretTier::Fallback,
                }
            }
        }
    }

    async fn ask_model(&self, message: &str) -> Result<DietaryPreferences, InterpretError> {
        let request = ChatRequest::new(build_prompt(message));
        let reply =
            complete_with_timeout(self.model.as_ref(), &request, self.call_timeout).await?;
        parse_preferences(&reply)
    }
}

/// Prompt constraining the reply to one JSON object with the nine fields.
fn build_prompt(message: &str) -> String {
    let fields = PreferenceField::ALL
        .iter()
        .map(|f| format!("- {} (true/false)", f.key()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"A restaurant customer described which dishes they want to see. Convert the request into a JSON object with exactly these boolean fields:
{fields}

"only" fields mean the customer wants to see only dishes of that kind. "exclude" fields mean dishes of that kind must be hidden. Set a field to true only when the request clearly asks for it; leave everything else false. The request may be in any language.

Customer request: "{message}"

Return only the JSON object, nothing else."#,
        message = message.trim().replace('"', "'"),
    )
}

/// Extract and validate the preference object from a reply.
///
/// Unknown fields are ignored; known fields must be booleans.
fn parse_preferences(reply: &str) -> Result<DietaryPreferences, InterpretError> {
    let span = json::first_object(reply)
        .ok_or_else(|| InterpretError::Malformed("no JSON object in reply".into()))?;
    serde_json::from_str(span).map_err(|e| InterpretError::Malformed(e.to_string()))
}
