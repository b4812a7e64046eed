//! Per-corpus embedding cache artifacts

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::Result;

/// File-backed cache of ordered corpus embedding vectors.
///
/// One JSON artifact per corpus name. An entry is written in full after a
/// complete embedding pass and loaded verbatim when present; presence
/// implies validity, and staleness against changed documents is the
/// caller's responsibility.
#[derive(Debug, Clone)]
pub struct EmbeddingCache {
    dir: PathBuf,
}

impl EmbeddingCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the artifact for a corpus name
    pub fn entry_path(&self, corpus_name: &str) -> PathBuf {
        self.dir.join(format!("{corpus_name}.json"))
    }

    /// Load the cached vector sequence, `None` when absent.
    ///
    /// # Errors
    /// - IO errors reading the artifact
    /// - Malformed artifact content
    pub fn load(&self, corpus_name: &str) -> Result<Option<Vec<Vec<f32>>>> {
        let path = self.entry_path(corpus_name);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let vectors: Vec<Vec<f32>> = serde_json::from_str(&content)?;

        info!(
            "Loaded {} cached embeddings from {}",
            vectors.len(),
            path.display()
        );
        Ok(Some(vectors))
    }

    /// Write the full vector sequence, replacing any existing entry
    pub fn save(&self, corpus_name: &str, vectors: &[Vec<f32>]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.entry_path(corpus_name);
        let content = serde_json::to_string(vectors)?;
        fs::write(&path, content)?;

        debug!("Saved {} embeddings to {}", vectors.len(), path.display());
        Ok(())
    }

    /// Remove the entry for a corpus name, if present
    pub fn invalidate(&self, corpus_name: &str) -> Result<()> {
        let path = self.entry_path(corpus_name);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Removed embedding cache entry {}", path.display());
        }
        Ok(())
    }
}
