//! Abstractive summarizer client
//!
//! Talks to a chat-completions style HTTP API. Calls carry a bounded
//! timeout so a hanging service cannot stall the polling loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "convo/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Summarizer client errors
#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Abstractive summarization bounded by a word-count window.
#[allow(async_fn_in_trait)]
pub trait Summarize {
    async fn summarize(
        &self,
        text: &str,
        min_length: u32,
        max_length: u32,
    ) -> Result<String, SummarizerError>;
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

/// Chat-completions backed summarizer.
pub struct ChatSummarizer {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatSummarizer {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
    ) -> Result<Self, SummarizerError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SummarizerError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
            model,
        })
    }

    fn build_prompt(text: &str, min_length: u32, max_length: u32) -> String {
        format!(
            "Summarize the following conversation transcript in {} to {} words. \
             Output only the summary text.\n\n{}",
            min_length, max_length, text
        )
    }

    fn extract_summary(response: ChatResponse) -> Result<String, SummarizerError> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        let summary = content.trim().to_string();
        if summary.is_empty() {
            return Err(SummarizerError::Parse("empty completion".to_string()));
        }
        Ok(summary)
    }
}

impl Summarize for ChatSummarizer {
    async fn summarize(
        &self,
        text: &str,
        min_length: u32,
        max_length: u32,
    ) -> Result<String, SummarizerError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You condense conversation transcripts into short prose summaries."
                        .to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::build_prompt(text, min_length, max_length),
                },
            ],
            temperature: 0.3,
        };

        tracing::debug!(chars = text.len(), "Requesting summary");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizerError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Api(status.as_u16(), error_text));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummarizerError::Parse(e.to_string()))?;

        Self::extract_summary(chat_response)
    }
}
