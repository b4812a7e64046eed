//! Embedding API client

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::Result;
use crate::errors::TanyaRagError;

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Client for generating embeddings from the model server
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    model: String,
    endpoint: String,
    client: Client,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    /// Create a new embedding client
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
        Self::new(config.embedding_model(), config.embedding_endpoint())
    }

    /// Generate the embedding vector for a single text unit.
    ///
    /// A successful result is never empty; every failure (network error,
    /// non-success status, missing or empty `embedding` field) is an
    /// explicit error the caller decides how to absorb. No retry is
    /// performed here; dropping the returned future cancels the request.
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, non-success status)
    /// - Invalid API responses (malformed JSON, missing embedding field)
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling embeddings API: {}", url);

        let request = EmbedRequest {
            model: &self.model,
            prompt: text,
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
            return Err(TanyaRagError::Embedding(format!(
                "Embeddings API error ({status}): {error_text}"
            )));
        }

        let result: EmbedResponse = response
            .json()
            .await
            .map_err(|e| TanyaRagError::Embedding(format!("Failed to parse response: {e}")))?;

        if result.embedding.is_empty() {
            return Err(TanyaRagError::Embedding(
                "Empty embedding in response".to_string(),
            ));
        }

        Ok(result.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client = EmbeddingClient::new("nomic-embed-text", "http://localhost:11434").unwrap();
        assert_eq!(client.model, "nomic-embed-text");
        assert_eq!(client.endpoint, "http://localhost:11434");
    }
}
