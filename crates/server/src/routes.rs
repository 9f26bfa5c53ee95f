use std::path::Path;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::observability;

pub mod auth;

use auth::ServerState;

pub async fn health(State(state): State<ServerState>) -> Json<Health> {
    Json(Health::now(&*state.service_name))
}

async fn metrics() -> (axum::http::StatusCode, String) {
    observability::encode_metrics()
}

/// Build the full application router: probes, auth API, and static assets for everything else
pub fn build_router(state: ServerState, cors: CorsLayer, static_dir: &Path) -> Router {
    // Public probes
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    // Auth API consumed by the front end
    let api = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login));

    public
        .merge(api)
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
