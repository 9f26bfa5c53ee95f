use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth::ServerState};
use service::{
    auth::{repo::JsonFileUserStore, AuthService},
    runtime,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the file-backed store, auth service and router from configuration.
pub fn build_app(cfg: &AppConfig) -> Router {
    let store = Arc::new(JsonFileUserStore::new(&cfg.storage.users_path));
    let state = ServerState::new(AuthService::new(store), cfg.server.service_name.as_str());
    routes::build_router(state, build_cors(), &cfg.storage.static_dir)
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.storage.static_dir, &cfg.storage.data_dir()).await?;

    let app = build_app(&cfg);

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        addr = %listener.local_addr()?,
        users_path = %cfg.storage.users_path.display(),
        static_dir = %cfg.storage.static_dir.display(),
        service = %cfg.server.service_name,
        "starting server"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
