//! Chat completion client with streamed-response accumulation

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use super::ChatMessage;
use crate::errors::Result;
use crate::errors::TanyaRagError;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Fixed user-facing answer when the model server cannot be reached
pub const FALLBACK_ANSWER: &str = "Maaf, saya tidak bisa terhubung ke API.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// One frame of a (possibly streamed) chat response
#[derive(Debug, Deserialize)]
struct ChatFragment {
    message: Option<FragmentMessage>,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
struct FragmentMessage {
    content: String,
}

/// Client for the chat completion endpoint
#[derive(Debug, Clone)]
pub struct LlmClient {
    model: String,
    endpoint: String,
    client: Client,
}

impl LlmClient {
    /// Create a new chat client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(model: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TanyaRagError::Http(e.to_string()))?;

        Ok(Self {
            model: model.into(),
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        Self::new(config.llm_model(), config.llm_endpoint())
    }

    /// Generate an answer for the conversation.
    ///
    /// Always yields text: a transport or status failure produces
    /// [`FALLBACK_ANSWER`] instead of an error, so the caller can persist
    /// and return a response unconditionally.
    pub async fn chat(&self, messages: &[ChatMessage]) -> String {
        match self.try_chat(messages).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Chat request failed: {e}; returning fallback answer");
                FALLBACK_ANSWER.to_string()
            }
        }
    }

    async fn try_chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.endpoint);
        debug!("Calling chat API: {}", url);

        let request = ChatRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| TanyaRagError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TanyaRagError::Http(format!(
                "Chat API error ({status}): {error_text}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TanyaRagError::Http(e.to_string()))?;

        Ok(accumulate_response(&body))
    }
}

/// Accumulate fragment text from a chat response body.
///
/// The body is either a single JSON object or newline-delimited JSON
/// fragments. Fragment content is concatenated in arrival order until the
/// first fragment with `done: true`; a line that fails to parse is
/// skipped with a warning and accumulation continues.
fn accumulate_response(body: &str) -> String {
    // A non-streamed response is one well-formed object
    if let Ok(fragment) = serde_json::from_str::<ChatFragment>(body) {
        return fragment
            .message
            .map(|message| message.content)
            .unwrap_or_default();
    }

    let mut full_response = String::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ChatFragment>(line) {
            Ok(fragment) => {
                if let Some(message) = fragment.message {
                    full_response.push_str(&message.content);
                }
                if fragment.done {
                    break;
                }
            }
            Err(e) => {
                warn!("Skipping malformed chat fragment: {e}");
            }
        }
    }

    full_response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_fragments_until_done() {
        let body = concat!(
            "{\"message\":{\"content\":\"Jakarta\"},\"done\":false}\n",
            "{\"message\":{\"content\":\" adalah ibu kota.\"},\"done\":true}\n",
        );
        assert_eq!(accumulate_response(body), "Jakarta adalah ibu kota.");
    }

    #[test]
    fn test_stops_at_first_done_fragment() {
        let body = concat!(
            "{\"message\":{\"content\":\"selesai\"},\"done\":true}\n",
            "{\"message\":{\"content\":\" diabaikan\"},\"done\":true}\n",
        );
        assert_eq!(accumulate_response(body), "selesai");
    }

    #[test]
    fn test_malformed_fragment_is_skipped() {
        let body = concat!(
            "this is not json\n",
            "{\"message\":{\"content\":\"bagian satu\"},\"done\":false}\n",
            "{\"message\":{\"content\":\" dan dua\"},\"done\":true}\n",
        );
        assert_eq!(accumulate_response(body), "bagian satu dan dua");
    }

    #[test]
    fn test_single_object_response() {
        let body = "{\"message\":{\"content\":\"jawaban lengkap\"},\"done\":true}";
        assert_eq!(accumulate_response(body), "jawaban lengkap");
    }

    #[test]
    fn test_fragment_without_message_is_tolerated() {
        let body = concat!(
            "{\"message\":{\"content\":\"isi\"},\"done\":false}\n",
            "{\"done\":true}\n",
        );
        assert_eq!(accumulate_response(body), "isi");
    }

    #[test]
    fn test_empty_body_yields_empty_answer() {
        assert_eq!(accumulate_response(""), "");
    }
}
