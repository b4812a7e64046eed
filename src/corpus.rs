//! Corpus loading from the document data directory
//!
//! File-format parsing beyond plain text happens upstream; this loader
//! reads the recognized plain-text formats and splits them into the
//! ordered paragraph sequence the embedding index mirrors.

use std::fs;
use std::path::Path;

use tracing::debug;
use tracing::info;

use crate::Result;

/// Recognized plain-text extensions
const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// A named, ordered sequence of text passages
#[derive(Debug, Clone)]
pub struct Corpus {
    name: String,
    paragraphs: Vec<String>,
}

impl Corpus {
    pub fn new(name: impl Into<String>, paragraphs: Vec<String>) -> Self {
        Self {
            name: name.into(),
            paragraphs,
        }
    }

    /// Load every recognized file under `dir`.
    ///
    /// Files are visited in sorted filename order so the paragraph
    /// sequence (and with it the embedding cache) is deterministic across
    /// startups.
    pub fn load_dir(name: impl Into<String>, dir: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut paragraphs = Vec::new();
        for path in paths {
            let recognized = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()));

            if !recognized {
                debug!("Skipping unrecognized file: {}", path.display());
                continue;
            }

            let content = fs::read_to_string(&path)?;
            paragraphs.extend(split_paragraphs(&content));
        }

        info!(
            "Loaded corpus '{}' with {} paragraphs from {}",
            name,
            paragraphs.len(),
            dir.as_ref().display()
        );

        Ok(Self { name, paragraphs })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn into_paragraphs(self) -> Vec<String> {
        self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Split text on blank lines into trimmed, non-empty paragraphs
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_split_paragraphs() {
        let text = "First paragraph.\n\nSecond paragraph\nstill second.\n\n\n\nThird.";
        let paragraphs = split_paragraphs(text);
        assert_eq!(
            paragraphs,
            vec![
                "First paragraph.",
                "Second paragraph\nstill second.",
                "Third."
            ]
        );
    }

    #[test]
    fn test_split_paragraphs_empty_input() {
        assert!(split_paragraphs("").is_empty());
        assert!(split_paragraphs("\n\n  \n\n").is_empty());
    }

    #[test]
    fn test_load_dir_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "beta one\n\nbeta two").unwrap();
        fs::write(dir.path().join("a.md"), "alpha").unwrap();
        fs::write(dir.path().join("c.pdf"), "binary-ish").unwrap();

        let corpus = Corpus::load_dir("test", dir.path()).unwrap();

        // a.md sorts before b.txt; c.pdf is not a recognized format
        assert_eq!(corpus.paragraphs(), &["alpha", "beta one", "beta two"]);
        assert_eq!(corpus.len(), 3);
    }

    #[test]
    fn test_load_dir_missing_directory_is_an_error() {
        assert!(Corpus::load_dir("test", "/nonexistent/nowhere").is_err());
    }
}
