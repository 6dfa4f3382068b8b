// JSON handlers over the snapshot cache and the container engine

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::AppState;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/snapshot — latest published snapshot. Served from the cache;
/// never waits on an upstream.
pub(super) async fn snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.cache.current().await;
    axum::Json(snapshot.as_ref().clone())
}

/// GET /api/health — per-source health of the latest snapshot.
pub(super) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.cache.current().await;
    axum::Json(serde_json::json!({
        "metadataOk": snapshot.source_health.metadata_ok,
        "runtimeOk": snapshot.source_health.runtime_ok,
        "refreshing": state.cache.is_refreshing(),
        "generatedAt": snapshot.generated_at,
    }))
}

/// POST /api/refresh — queue a manual refresh. `triggered: false` means a
/// refresh was already running or queued; that one covers the request.
pub(super) async fn refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    let triggered = state.cache.trigger_refresh();
    (
        StatusCode::ACCEPTED,
        axum::Json(serde_json::json!({ "triggered": triggered })),
    )
}

enum ContainerAction {
    Start,
    Stop,
    Restart,
}

impl ContainerAction {
    fn as_str(&self) -> &'static str {
        match self {
            ContainerAction::Start => "start",
            ContainerAction::Stop => "stop",
            ContainerAction::Restart => "restart",
        }
    }
}

pub(super) async fn start_container_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    container_action(&state, &id, ContainerAction::Start).await
}

pub(super) async fn stop_container_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    container_action(&state, &id, ContainerAction::Stop).await
}

pub(super) async fn restart_container_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    container_action(&state, &id, ContainerAction::Restart).await
}

async fn container_action(state: &AppState, id: &str, action: ContainerAction) -> Response {
    let Some(docker) = state.docker.as_ref() else {
        return engine_unavailable();
    };
    let result = match action {
        ContainerAction::Start => docker.start_container(id).await,
        ContainerAction::Stop => docker.stop_container(id).await,
        ContainerAction::Restart => docker.restart_container(id).await,
    };
    match result {
        Ok(()) => {
            // Pull the state change into the next snapshot right away.
            state.cache.trigger_refresh();
            (
                StatusCode::ACCEPTED,
                axum::Json(serde_json::json!({ "id": id, "action": action.as_str() })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = action.as_str(),
                container_id = %id,
                "container action failed"
            );
            (
                StatusCode::BAD_GATEWAY,
                axum::Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
pub(super) struct LogsQuery {
    #[serde(default = "default_tail")]
    tail: u32,
}

fn default_tail() -> u32 {
    100
}

/// GET /api/containers/{id}/logs?tail=N — recent engine log lines.
pub(super) async fn container_logs_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Response {
    let Some(docker) = state.docker.as_ref() else {
        return engine_unavailable();
    };
    match docker.container_logs(&id, query.tail).await {
        Ok(lines) => axum::Json(lines).into_response(),
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = "container_logs",
                container_id = %id,
                "log fetch failed"
            );
            (
                StatusCode::BAD_GATEWAY,
                axum::Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

fn engine_unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        axum::Json(serde_json::json!({ "error": "container engine unavailable" })),
    )
        .into_response()
}
