//! Remote markdown cleaning via a chat-completion API
//!
//! One call per URL. The completion text is used verbatim as the cleaned
//! markdown; no structural validation is applied to it.

use crate::config::Config;
use crate::error::HarvestError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Completion cap for a single cleaning call
const MAX_TOKENS: u32 = 4000;

/// Sampling parameters, fixed for reproducible cleanups
const TEMPERATURE: f32 = 0.1;
const TOP_P: f32 = 0.9;
const FREQUENCY_PENALTY: f32 = 0.0;
const PRESENCE_PENALTY: f32 = 0.0;

/// Cleaning policy sent as the system message
const CLEANING_PROMPT: &str = "You are a technical documentation editor. \
Restructure the markdown you receive into clean, well-organized documentation. \
Keep every piece of technical content, code samples, and headings. Remove \
navigation menus, footers, cookie notices, advertising, and other page chrome. \
Use ATX headings and fenced code blocks. Respond with the cleaned markdown \
only, no commentary.";

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

impl Message {
    fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Client for the remote cleaning collaborator
pub struct MarkdownCleaner {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl MarkdownCleaner {
    /// Create a cleaner from the run configuration
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.clone(),
            model: config.model.clone(),
        }
    }

    /// Submit raw markdown for cleaning and return the completion text
    ///
    /// Auth failures, rate limits, timeouts, and malformed responses all
    /// surface as extraction errors for `source_url`. No retry.
    pub async fn clean(&self, markdown: &str, source_url: &str) -> Result<String, HarvestError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(CLEANING_PROMPT),
                Message::user(format!(
                    "Clean the following markdown captured from {}:\n\n{}",
                    source_url, markdown
                )),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = source_url, "cleaning request failed");
                HarvestError::extraction(source_url, format!("cleaning request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, url = source_url, "cleaning API error");
            return Err(HarvestError::extraction(
                source_url,
                format!("cleaning API error ({}): {}", status, error_text),
            ));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            HarvestError::extraction(source_url, format!("malformed cleaning response: {}", e))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                HarvestError::extraction(source_url, "no completion choices in response")
            })?;

        debug!(url = source_url, clean_len = content.len(), "cleaned markdown");

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roles() {
        assert_eq!(Message::system("policy").role, "system");
        assert_eq!(Message::user("content").role, "user");
    }

    #[test]
    fn test_request_serialization_carries_fixed_parameters() {
        let request = ChatRequest {
            model: "test-model".to_string(),
            messages: vec![Message::system(CLEANING_PROMPT), Message::user("body")],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["max_tokens"], 4000);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!((json["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert!((json["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_response_parsing() {
        let body = r##"{"choices":[{"message":{"role":"assistant","content":"# Clean"}}]}"##;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "# Clean");
    }
}
