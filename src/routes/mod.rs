// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::cache::SnapshotCache;
use crate::docker_repo::DockerRepo;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) cache: Arc<SnapshotCache>,
    /// None when no container engine is reachable; action and log routes
    /// then answer 503.
    pub(crate) docker: Option<Arc<DockerRepo>>,
}

pub fn app(cache: Arc<SnapshotCache>, docker: Option<Arc<DockerRepo>>) -> Router {
    let state = AppState { cache, docker };
    Router::new()
        .route("/", get(|| async { "svclens: service discovery for one host" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/snapshot", get(http::snapshot_handler)) // GET /api/snapshot
        .route("/api/health", get(http::health_handler)) // GET /api/health
        .route("/api/refresh", post(http::refresh_handler)) // POST /api/refresh
        .route(
            "/api/containers/{id}/start",
            post(http::start_container_handler),
        )
        .route(
            "/api/containers/{id}/stop",
            post(http::stop_container_handler),
        )
        .route(
            "/api/containers/{id}/restart",
            post(http::restart_container_handler),
        )
        .route(
            "/api/containers/{id}/logs",
            get(http::container_logs_handler),
        )
        .route("/ws/services", get(ws::ws_services)) // WS /ws/services
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
