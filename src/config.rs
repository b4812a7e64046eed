use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub name: String,
    pub data_dir: String,
    pub embeddings_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub endpoint: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
}

fn default_llm_model() -> String {
    "llama3".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub corpus: CorpusConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: AppConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::TanyaRagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Get database URL
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Get max connections for database pool
    pub fn max_connections(&self) -> u32 {
        self.database.max_connections
    }

    /// Get connection timeout in seconds
    pub fn connection_timeout(&self) -> u64 {
        self.database.connection_timeout
    }

    /// Get configured log level
    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    /// Get corpus name (embedding cache key)
    pub fn corpus_name(&self) -> &str {
        &self.corpus.name
    }

    /// Get document data directory
    pub fn data_dir(&self) -> &str {
        &self.corpus.data_dir
    }

    /// Get embedding cache directory
    pub fn embeddings_dir(&self) -> &str {
        &self.corpus.embeddings_dir
    }

    /// Get embedding service endpoint
    pub fn embedding_endpoint(&self) -> &str {
        &self.embeddings.endpoint
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    /// Get the number of context passages per question
    pub fn top_k(&self) -> usize {
        self.retrieval.top_k
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://tanyarag.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: false,
            },
            corpus: CorpusConfig {
                name: "data_api".to_string(),
                data_dir: "data".to_string(),
                embeddings_dir: "embeddings".to_string(),
            },
            embeddings: EmbeddingsConfig {
                endpoint: "http://localhost:11434".to_string(),
                model: default_embedding_model(),
            },
            llm: LlmConfig {
                endpoint: "http://localhost:11434".to_string(),
                model: default_llm_model(),
            },
            retrieval: RetrievalConfig::default(),
        }
    }
}
