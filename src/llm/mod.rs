//! LLM chat completion module
//!
//! Wraps the remote chat capability: role-tagged conversation messages in,
//! one accumulated answer string out. The client absorbs transport
//! failures into a fixed fallback answer so the pipeline always has text
//! to persist and return.

pub mod client;
pub mod prompts;

pub use client::LlmClient;
pub use client::FALLBACK_ANSWER;

use serde::Deserialize;
use serde::Serialize;

/// Role-tagged message in a model conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
