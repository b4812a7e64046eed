//! RAG (Retrieval-Augmented Generation) module
//!
//! End-to-end question answering over the indexed corpus:
//! - cosine-similarity ranking of corpus passages against the query
//! - top-K context assembly into a fixed system instruction
//! - LLM-based answer generation
//! - conversation-turn persistence
//!
//! # Examples
//!
//! ```rust,no_run
//! use tanyarag::config::AppConfig;
//! use tanyarag::rag::RagService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = RagService::new(&config).await?;
//!
//!     let answer = service.ask("Apa ibu kota Indonesia?").await?;
//!     println!("{answer}");
//!
//!     Ok(())
//! }
//! ```

pub mod pipeline;
pub mod ranker;

pub use pipeline::RagService;
pub use ranker::cosine_similarity;
pub use ranker::rank;

/// Scored candidate position from a ranking pass. Transient: recomputed
/// per query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedPassage {
    pub score: f32,
    pub index: usize,
}
