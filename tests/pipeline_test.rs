//! End-to-end pipeline scenarios against a mock model server

use std::sync::Arc;

use serde_json::json;
use serde_json::Value;
use sqlx::SqlitePool;
use tanyarag::corpus::Corpus;
use tanyarag::database::Database;
use tanyarag::embeddings::CorpusIndex;
use tanyarag::embeddings::EmbeddingCache;
use tanyarag::embeddings::EmbeddingClient;
use tanyarag::llm::LlmClient;
use tanyarag::llm::FALLBACK_ANSWER;
use tanyarag::models::ChatRole;
use tanyarag::rag::RagService;
use tanyarag::TanyaRagError;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

const CAPITAL_PASSAGE: &str = "Jakarta is the capital.";
const FASHION_PASSAGE: &str = "Bandung is known for fashion.";
const QUESTION: &str = "What is the capital?";

async fn memory_database() -> Arc<Database> {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    let database = Database::new(pool);
    database.init_schema().await.unwrap();
    Arc::new(database)
}

fn test_corpus() -> Corpus {
    Corpus::new(
        "test_corpus",
        vec![CAPITAL_PASSAGE.to_string(), FASHION_PASSAGE.to_string()],
    )
}

fn embedding_mock(prompt: &str, vector: &[f32]) -> Mock {
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .and(body_partial_json(json!({ "prompt": prompt })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "embedding": vector })))
}

fn chat_mock(ndjson_body: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(ndjson_body.to_string(), "application/x-ndjson"),
        )
}

/// Mount embedding mocks so the capital passage aligns with the question
/// and the fashion passage does not
async fn mount_corpus_embeddings(server: &MockServer) {
    embedding_mock(CAPITAL_PASSAGE, &[1.0, 0.0, 0.0])
        .mount(server)
        .await;
    embedding_mock(FASHION_PASSAGE, &[0.0, 1.0, 0.0])
        .mount(server)
        .await;
    embedding_mock(QUESTION, &[0.9, 0.1, 0.0]).mount(server).await;
}

async fn build_service(server: &MockServer, database: Arc<Database>) -> RagService {
    let cache_dir = tempfile::tempdir().unwrap();
    let cache = EmbeddingCache::new(cache_dir.path());
    let client = EmbeddingClient::new("nomic-embed-text", server.uri()).unwrap();
    let llm_client = LlmClient::new("llama3", server.uri()).unwrap();

    let index = Arc::new(
        CorpusIndex::build(test_corpus(), &client, &cache)
            .await
            .unwrap(),
    );

    RagService::from_services(index, database, client, llm_client, 5)
}

#[tokio::test]
async fn answers_with_top_ranked_context() {
    let server = MockServer::start().await;
    mount_corpus_embeddings(&server).await;
    chat_mock(concat!(
        "{\"message\":{\"content\":\"Jakarta\"},\"done\":false}\n",
        "{\"message\":{\"content\":\" adalah ibu kota.\"},\"done\":true}\n",
    ))
    .mount(&server)
    .await;

    let database = memory_database().await;
    let service = build_service(&server, database.clone()).await;

    let answer = service.ask(QUESTION).await.unwrap();
    assert_eq!(answer, "Jakarta adalah ibu kota.");

    // The generation request's system prompt carries the context, with the
    // best-matching passage ranked first
    let requests = server.received_requests().await.unwrap();
    let chat_request = requests
        .iter()
        .find(|r| r.url.path() == "/api/chat")
        .expect("chat request sent");
    let body: Value = serde_json::from_slice(&chat_request.body).unwrap();
    let system_prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(system_prompt.contains(CAPITAL_PASSAGE));
    let capital_at = system_prompt.find(CAPITAL_PASSAGE).unwrap();
    let fashion_at = system_prompt.find(FASHION_PASSAGE).unwrap();
    assert!(capital_at < fashion_at);
    assert_eq!(body["messages"][1]["content"].as_str().unwrap(), QUESTION);

    // Exactly two turns persisted: the question, then the answer
    let turns = database.list_chat_turns().await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, ChatRole::User);
    assert_eq!(turns[0].message, QUESTION);
    assert_eq!(turns[1].role, ChatRole::Bot);
    assert_eq!(turns[1].message, "Jakarta adalah ibu kota.");
}

#[tokio::test]
async fn empty_question_is_rejected_without_persistence() {
    let server = MockServer::start().await;
    let database = memory_database().await;
    let service = build_static_index_service(&server, database.clone());

    let error = service.ask("   ").await.unwrap_err();
    match error {
        TanyaRagError::Validation(message) => {
            assert_eq!(message, "Pertanyaan wajib diisi.");
        }
        other => panic!("expected validation error, got {other}"),
    }

    assert_eq!(database.count_chat_turns().await.unwrap(), 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn embedding_failure_persists_only_the_user_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let database = memory_database().await;
    let service = build_static_index_service(&server, database.clone());

    let error = service.ask(QUESTION).await.unwrap_err();
    match error {
        TanyaRagError::Embedding(message) => {
            assert_eq!(message, "Gagal menghasilkan embedding untuk pertanyaan.");
        }
        other => panic!("expected embedding error, got {other}"),
    }

    let turns = database.list_chat_turns().await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, ChatRole::User);
}

#[tokio::test]
async fn generation_failure_falls_back_and_still_persists() {
    let server = MockServer::start().await;
    mount_corpus_embeddings(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let database = memory_database().await;
    let service = build_service(&server, database.clone()).await;

    let answer = service.ask(QUESTION).await.unwrap();
    assert_eq!(answer, FALLBACK_ANSWER);

    let turns = database.list_chat_turns().await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].message, FALLBACK_ANSWER);
}

#[tokio::test]
async fn cached_corpus_skips_remote_embedding() {
    let cache_dir = tempfile::tempdir().unwrap();
    let cache = EmbeddingCache::new(cache_dir.path());

    // First pass populates the cache
    let first_server = MockServer::start().await;
    mount_corpus_embeddings(&first_server).await;
    let first_client = EmbeddingClient::new("nomic-embed-text", first_server.uri()).unwrap();
    CorpusIndex::build(test_corpus(), &first_client, &cache)
        .await
        .unwrap();
    assert_eq!(first_server.received_requests().await.unwrap().len(), 2);

    // Second pass must perform zero remote calls
    let second_server = MockServer::start().await;
    let second_client = EmbeddingClient::new("nomic-embed-text", second_server.uri()).unwrap();
    let index = CorpusIndex::build(test_corpus(), &second_client, &cache)
        .await
        .unwrap();

    assert_eq!(index.len(), 2);
    assert!(second_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_document_embedding_ranks_last() {
    let server = MockServer::start().await;
    // Only the capital passage and the question embed successfully; the
    // fashion passage gets a server error and becomes a placeholder
    embedding_mock(CAPITAL_PASSAGE, &[1.0, 0.0, 0.0])
        .mount(&server)
        .await;
    embedding_mock(QUESTION, &[0.9, 0.1, 0.0]).mount(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    chat_mock("{\"message\":{\"content\":\"ok\"},\"done\":true}\n")
        .mount(&server)
        .await;

    let database = memory_database().await;
    let service = build_service(&server, database).await;

    service.ask(QUESTION).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let chat_request = requests
        .iter()
        .find(|r| r.url.path() == "/api/chat")
        .expect("chat request sent");
    let body: Value = serde_json::from_slice(&chat_request.body).unwrap();
    let system_prompt = body["messages"][0]["content"].as_str().unwrap();

    // The failed passage still appears in the candidate set, ranked after
    // the passage with a real embedding
    let capital_at = system_prompt.find(CAPITAL_PASSAGE).unwrap();
    let fashion_at = system_prompt.find(FASHION_PASSAGE).unwrap();
    assert!(capital_at < fashion_at);
}

fn build_static_index_service(server: &MockServer, database: Arc<Database>) -> RagService {
    let client = EmbeddingClient::new("nomic-embed-text", server.uri()).unwrap();
    let llm_client = LlmClient::new("llama3", server.uri()).unwrap();
    let index = Arc::new(CorpusIndex::from_parts(
        vec![CAPITAL_PASSAGE.to_string()],
        vec![vec![1.0, 0.0, 0.0]],
    ));
    RagService::from_services(index, database, client, llm_client, 5)
}
