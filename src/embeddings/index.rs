//! In-memory corpus index built once at startup

use futures::stream;
use futures::StreamExt;
use tracing::info;
use tracing::warn;

use super::cache::EmbeddingCache;
use super::client::EmbeddingClient;
use crate::corpus::Corpus;
use crate::Result;

/// Concurrent in-flight embedding requests during ingestion
const EMBED_CONCURRENCY: usize = 8;

/// The paragraph/vector pair set the ranker searches.
///
/// Built once at startup and immutable afterwards, so it can be shared
/// behind an `Arc` and read concurrently without locking. Index `i` of
/// the vector set always corresponds to paragraph `i`.
#[derive(Debug)]
pub struct CorpusIndex {
    paragraphs: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl CorpusIndex {
    /// Build the index for a corpus, reusing cached vectors when present.
    ///
    /// A cache hit performs zero remote calls. On a miss every paragraph
    /// is embedded with bounded, order-preserving concurrency; a
    /// paragraph whose embedding fails is kept in the candidate set as an
    /// empty placeholder, which the ranker orders last. The freshly
    /// computed vector set is then saved in full; a save failure is
    /// logged and the index proceeds uncached.
    pub async fn build(
        corpus: Corpus,
        client: &EmbeddingClient,
        cache: &EmbeddingCache,
    ) -> Result<Self> {
        let name = corpus.name().to_string();
        let paragraphs = corpus.into_paragraphs();

        match cache.load(&name) {
            Ok(Some(vectors)) => {
                if vectors.len() != paragraphs.len() {
                    warn!(
                        "Embedding cache for '{}' holds {} vectors but the corpus has {} \
                         paragraphs; using the entry verbatim (run `ingest --refresh` to rebuild)",
                        name,
                        vectors.len(),
                        paragraphs.len()
                    );
                }
                info!(
                    "Corpus '{}' ready: {} paragraphs, cached embeddings",
                    name,
                    paragraphs.len()
                );
                return Ok(Self {
                    paragraphs,
                    vectors,
                });
            }
            Ok(None) => {
                info!("No embedding cache for '{}', generating embeddings...", name);
            }
            Err(e) => {
                warn!("Failed to read embedding cache for '{}': {e}; recomputing", name);
            }
        }

        let results: Vec<Result<Vec<f32>>> = stream::iter(paragraphs.iter())
            .map(|paragraph| client.embed(paragraph))
            .buffered(EMBED_CONCURRENCY)
            .collect()
            .await;

        let mut failed = 0usize;
        let vectors: Vec<Vec<f32>> = results
            .into_iter()
            .enumerate()
            .map(|(idx, result)| match result {
                Ok(vector) => vector,
                Err(e) => {
                    warn!("Embedding paragraph {idx} failed: {e}");
                    failed += 1;
                    Vec::new()
                }
            })
            .collect();

        if failed > 0 {
            warn!(
                "{failed} of {} paragraphs have no embedding and will rank last",
                vectors.len()
            );
        }

        if let Err(e) = cache.save(&name, &vectors) {
            warn!("Failed to save embedding cache for '{}': {e}; continuing uncached", name);
        }

        info!(
            "Corpus '{}' ready: {} paragraphs embedded",
            name,
            paragraphs.len()
        );

        Ok(Self {
            paragraphs,
            vectors,
        })
    }

    /// Assemble an index from precomputed parts, without remote calls
    pub fn from_parts(paragraphs: Vec<String>, vectors: Vec<Vec<f32>>) -> Self {
        Self {
            paragraphs,
            vectors,
        }
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn paragraph(&self, index: usize) -> Option<&str> {
        self.paragraphs.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}
