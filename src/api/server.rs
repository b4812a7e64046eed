//! HTTP server implementation

use std::sync::Arc;

use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::rag::RagService;
use crate::Result;

/// Start the API server
pub async fn serve_api(
    config: &AppConfig,
    host: String,
    port: u16,
    enable_cors: bool,
) -> Result<()> {
    info!("Starting tanyarag API server...");

    // Initialize services; the corpus index is built here, once, and
    // shared read-only across requests
    let rag_service = Arc::new(RagService::new(config).await?);
    let database = rag_service.database();

    let state = AppState {
        rag_service,
        database,
    };

    let mut app = routes::api_routes(state).layer(TraceLayer::new_for_http());

    if enable_cors {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /health       - Health check");
    info!("  POST /ask          - Ask a question");
    info!("  GET  /chat-history - List conversation turns");

    axum::serve(listener, app).await?;

    Ok(())
}
