// App layer: HTTP boundary in front of the bet orchestrator.

pub mod error;
pub mod handlers;

use crate::core::orchestrator::BetOrchestrator;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<BetOrchestrator>,
    /// Shown by the health endpoint.
    pub grpc_server: String,
    pub frontend_dir: String,
}

pub fn create_app(state: AppState) -> Router {
    let frontend = ServeDir::new(&state.frontend_dir);

    Router::new()
        .route("/api/bet", post(handlers::place_bet))
        .route("/api/results", get(handlers::results))
        .route("/api/health", get(handlers::health))
        .fallback_service(frontend)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
