//! Complete question pipeline: validate -> embed -> rank -> generate -> persist

use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::corpus::Corpus;
use crate::database::Database;
use crate::embeddings::CorpusIndex;
use crate::embeddings::EmbeddingCache;
use crate::embeddings::EmbeddingClient;
use crate::errors::Result;
use crate::errors::TanyaRagError;
use crate::llm::prompts;
use crate::llm::ChatMessage;
use crate::llm::LlmClient;
use crate::models::ChatRole;
use crate::rag::rank;
use crate::rag::RankedPassage;

/// Validation message for an empty question
pub const EMPTY_QUESTION_MESSAGE: &str = "Pertanyaan wajib diisi.";

/// Service message when the query embedding cannot be produced
pub const QUERY_EMBEDDING_FAILED_MESSAGE: &str = "Gagal menghasilkan embedding untuk pertanyaan.";

/// Complete RAG service
pub struct RagService {
    index: Arc<CorpusIndex>,
    database: Arc<Database>,
    embedding_client: EmbeddingClient,
    llm_client: LlmClient,
    top_k: usize,
}

impl RagService {
    /// Create a new RAG service, building the full stack from configuration:
    /// conversation store, corpus, embedding index, and remote clients.
    ///
    /// # Errors
    /// - Database connection errors
    /// - Corpus directory read errors
    /// - Remote client configuration errors
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let database = Arc::new(Database::from_config(config).await?);
        let embedding_client = EmbeddingClient::from_config(config)?;
        let llm_client = LlmClient::from_config(config)?;

        let corpus = Corpus::load_dir(config.corpus_name(), config.data_dir())?;
        let cache = EmbeddingCache::new(config.embeddings_dir());
        let index = Arc::new(CorpusIndex::build(corpus, &embedding_client, &cache).await?);

        Ok(Self::from_services(
            index,
            database,
            embedding_client,
            llm_client,
            config.top_k(),
        ))
    }

    /// Create from existing services
    pub fn from_services(
        index: Arc<CorpusIndex>,
        database: Arc<Database>,
        embedding_client: EmbeddingClient,
        llm_client: LlmClient,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            database,
            embedding_client,
            llm_client,
            top_k,
        }
    }

    /// Answer a question over the indexed corpus.
    ///
    /// The user turn is persisted as soon as the question passes
    /// validation, the bot turn after generation; the two writes commit
    /// independently and are best-effort (a store failure is logged and
    /// never blocks the answer). A query-embedding failure aborts before
    /// ranking with a service error, leaving the already-recorded user
    /// turn in place. A generation failure never surfaces here: the chat
    /// client substitutes its fallback text and the pipeline proceeds to
    /// persistence and response.
    ///
    /// # Errors
    /// - Empty or whitespace-only question (validation, no side effects)
    /// - Query embedding failure
    pub async fn ask(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TanyaRagError::Validation(
                EMPTY_QUESTION_MESSAGE.to_string(),
            ));
        }

        info!("Processing question: {}", question);

        if let Err(e) = self
            .database
            .append_chat_turn(ChatRole::User, question)
            .await
        {
            warn!("Failed to persist user turn: {e}");
        }

        debug!("Step 1: Embedding query");
        let query_embedding = match self.embedding_client.embed(question).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!("Query embedding failed: {e}");
                return Err(TanyaRagError::Embedding(
                    QUERY_EMBEDDING_FAILED_MESSAGE.to_string(),
                ));
            }
        };

        debug!("Step 2: Ranking {} passages", self.index.len());
        let ranked = rank(&query_embedding, self.index.vectors());

        debug!("Step 3: Assembling prompt from top {} passages", self.top_k);
        let context = self.assemble_context(&ranked);
        let messages = [
            ChatMessage::system(prompts::build_system_prompt(&context)),
            ChatMessage::user(question),
        ];

        debug!("Step 4: Generating answer");
        let answer = self.llm_client.chat(&messages).await;

        if let Err(e) = self.database.append_chat_turn(ChatRole::Bot, &answer).await {
            warn!("Failed to persist bot turn: {e}");
        }

        info!("Question answered");
        Ok(answer)
    }

    /// Join the top-K ranked passages, best first
    fn assemble_context(&self, ranked: &[RankedPassage]) -> String {
        ranked
            .iter()
            .take(self.top_k)
            .filter_map(|passage| self.index.paragraph(passage.index))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get the conversation store shared by this service
    pub fn database(&self) -> Arc<Database> {
        self.database.clone()
    }

    /// Get the corpus index shared by this service
    pub fn index(&self) -> Arc<CorpusIndex> {
        self.index.clone()
    }
}
