//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create the service router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Question answering
        .route("/ask", post(handlers::ask))
        // Conversation log
        .route("/chat-history", get(handlers::chat_history))
        .with_state(state)
}
