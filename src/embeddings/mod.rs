//! Embedding generation and caching
//!
//! This module turns the ordered corpus paragraphs into the in-memory
//! vector set the ranker searches:
//! - a thin client for the remote embedding endpoint
//! - a per-corpus JSON cache so embeddings are computed once
//! - the immutable index pairing paragraphs with their vectors
//!
//! # Examples
//!
//! ```rust,no_run
//! use tanyarag::config::AppConfig;
//! use tanyarag::corpus::Corpus;
//! use tanyarag::embeddings::{CorpusIndex, EmbeddingCache, EmbeddingClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::from_config(&config)?;
//!     let cache = EmbeddingCache::new(config.embeddings_dir());
//!     let corpus = Corpus::load_dir(config.corpus_name(), config.data_dir())?;
//!
//!     let index = CorpusIndex::build(corpus, &client, &cache).await?;
//!     println!("Indexed {} paragraphs", index.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod index;

pub use cache::EmbeddingCache;
pub use client::EmbeddingClient;
pub use index::CorpusIndex;
