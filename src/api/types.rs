//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::models::ChatTurn;

/// Question payload for `POST /ask`
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

/// Successful answer body
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: String,
}

/// Error body with a human-readable message
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Chat history body, turns ordered oldest first
#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub chat_history: Vec<ChatTurn>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
