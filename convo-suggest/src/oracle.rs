//! Reasoning oracle client for product suggestions
//!
//! One structured prompt per cycle; the reply must be either the literal
//! sentinel `None` ("no relevant product") or a JSON object matching
//! [`SuggestionSet`] with at most [`MAX_SUGGESTIONS`] entries. Anything
//! else is a schema violation surfaced as [`SuggestionOutcome::Failed`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "convo/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of suggestions accepted from one oracle round-trip.
pub const MAX_SUGGESTIONS: usize = 3;

/// Reasoning oracle errors
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Schema violation: {0}")]
    Schema(String),
}

/// One ranked product suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSuggestion {
    pub product_id: i64,
    pub reasoning: String,
}

/// Ordered, all-or-nothing list of 0 to 3 suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestionSet {
    pub product_ids: Vec<ProductSuggestion>,
}

/// Explicit cycle result; the write step consumes this without exceptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    /// A valid non-empty suggestion list.
    Produced(SuggestionSet),
    /// The oracle judged no product relevant (sentinel or empty list).
    Empty,
    /// Transport failure or schema violation; reason is logged, not written.
    Failed(String),
}

/// External reasoning oracle.
#[allow(async_fn_in_trait)]
pub trait SuggestOracle {
    async fn suggest(&self, profile: &str, transcript: &str, catalog: &str) -> SuggestionOutcome;
}

/// Validate a raw oracle reply against the suggestion schema.
pub fn parse_suggestions(raw: &str) -> Result<SuggestionOutcome, OracleError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return Ok(SuggestionOutcome::Empty);
    }

    let set: SuggestionSet =
        serde_json::from_str(trimmed).map_err(|e| OracleError::Schema(e.to_string()))?;

    if set.product_ids.len() > MAX_SUGGESTIONS {
        return Err(OracleError::Schema(format!(
            "{} suggestions returned, at most {} allowed",
            set.product_ids.len(),
            MAX_SUGGESTIONS
        )));
    }

    if set.product_ids.is_empty() {
        Ok(SuggestionOutcome::Empty)
    } else {
        Ok(SuggestionOutcome::Produced(set))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completions backed reasoning oracle.
pub struct ChatOracle {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatOracle {
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, OracleError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| OracleError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
            model,
        })
    }

    fn build_prompt(profile: &str, transcript: &str, catalog: &str) -> String {
        format!(
            "A client with the following profile is well known to the bank:\n\
             ---\n{profile}\n---\n\
             During a recent conversation, the following transcript was generated:\n\
             ---\n{transcript}\n---\n\
             The bank offers the following products (with their IDs) to clients:\n\n\
             Product Data:\n{catalog}\n\n\
             Based on the client information and the realtime conversation, provide a top \
             list of up to {max} product suggestions. Return your response as a JSON object \
             matching this schema:\n\
             {{\n\
               \"product_ids\": [\n\
                 {{\n\
                   \"product_id\": <number>,\n\
                   \"reasoning\": \"<brief explanation for suggesting this product>\"\n\
                 }}\n\
               ]\n\
             }}\n\n\
             If no product is relevant, return None (without quotes). Only output the JSON \
             object (or the word None), with no additional text.",
            max = MAX_SUGGESTIONS
        )
    }

    async fn request(&self, prompt: String) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are an expert financial advisor assistant.".to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.3,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OracleError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OracleError::Api(status.as_u16(), error_text));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Schema(e.to_string()))?;

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

impl SuggestOracle for ChatOracle {
    async fn suggest(&self, profile: &str, transcript: &str, catalog: &str) -> SuggestionOutcome {
        let prompt = Self::build_prompt(profile, transcript, catalog);
        tracing::debug!(transcript_chars = transcript.len(), "Requesting suggestions");

        match self.request(prompt).await {
            Ok(raw) => match parse_suggestions(&raw) {
                Ok(outcome) => outcome,
                Err(e) => SuggestionOutcome::Failed(e.to_string()),
            },
            Err(e) => SuggestionOutcome::Failed(e.to_string()),
        }
    }
}
