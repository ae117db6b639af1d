//! # API Handlers
//!
//! `GET /<container>.json` runs a film query against the container;
//! `GET /api/status` describes the running hub.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use reel_core::{CancelToken, LimitMode, CONTENT_TYPE};

use crate::error::HubError;
use crate::state::{AppState, SourceKind};

/// Extension that selects the JSON rendition of a container.
pub const JSON_EXTENSION: &str = ".json";

// =============================================================================
// Film Query
// =============================================================================

pub async fn query_container(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, HubError> {
    let container = container_path(&path)
        .ok_or_else(|| HubError::NotFound(format!("no JSON rendition at /{path}")))?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("query", %request_id, container = %container);

    async move {
        tracing::debug!(params = params.len(), "query received");

        let cancel = CancelToken::new();
        // Dropped with the request future if the client goes away.
        let guard = cancel.cancel_on_drop();

        let task_span = tracing::Span::current();
        let result = tokio::task::spawn_blocking(move || {
            let _entered = task_span.enter();
            state.run_query(&container, &params, &cancel)
        })
        .await;
        guard.disarm();

        let body = result.map_err(|e| HubError::Internal(format!("query task failed: {e}")))??;
        tracing::debug!(bytes = body.len(), "query answered");

        Ok::<_, HubError>((StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response())
    }
    .instrument(span)
    .await
}

/// `content/oscars.json` → `/content/oscars`. `None` without the extension.
fn container_path(path: &str) -> Option<String> {
    let stem = path.strip_suffix(JSON_EXTENSION)?;
    if stem.is_empty() {
        return None;
    }
    Some(format!("/{}", stem.trim_start_matches('/')))
}

// =============================================================================
// Status
// =============================================================================

#[derive(Serialize)]
pub struct HubStatus {
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub source: SourceKind,
    pub limit_mode: LimitMode,
    pub container_resource_type: Option<String>,
    pub containers: Vec<String>,
}

pub async fn status(State(state): State<Arc<AppState>>) -> Json<HubStatus> {
    Json(HubStatus {
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        started_at: state.started_at.to_rfc3339(),
        source: state.source_kind,
        limit_mode: state.engine.limit_mode(),
        container_resource_type: state.container_resource_type.clone(),
        containers: state.source.containers(),
    })
}
