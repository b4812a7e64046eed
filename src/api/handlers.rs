//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::types::*;
use crate::database::Database;
use crate::errors::TanyaRagError;
use crate::rag::RagService;

/// Shared application state, immutable after startup
#[derive(Clone)]
pub struct AppState {
    pub rag_service: Arc<RagService>,
    pub database: Arc<Database>,
}

type HandlerResult<T> = std::result::Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Health check handler
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Answer a question over the indexed corpus
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> HandlerResult<AskResponse> {
    info!("POST /ask");

    match state.rag_service.ask(&req.question).await {
        Ok(answer) => Ok(Json(AskResponse { response: answer })),
        Err(TanyaRagError::Validation(message)) => {
            Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))))
        }
        Err(TanyaRagError::Embedding(message)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(message)),
        )),
        Err(e) => {
            error!("Error answering question: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            ))
        }
    }
}

/// List persisted conversation turns, oldest first
pub async fn chat_history(State(state): State<AppState>) -> HandlerResult<ChatHistoryResponse> {
    info!("GET /chat-history");

    match state.database.list_chat_turns().await {
        Ok(turns) => Ok(Json(ChatHistoryResponse {
            chat_history: turns,
        })),
        Err(e) => {
            error!("Error fetching chat history: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("Gagal mengambil data chat: {e}"))),
            ))
        }
    }
}
