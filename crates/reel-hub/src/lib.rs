//! # reel-hub — The "Projector" of REEL
//!
//! Serves film queries over HTTP. Every GET to `/<container>.json` evaluates
//! the query parameters against that container's children and answers
//! `{"results": [...]}`.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError};
pub use error::{ApiError, HubError};
pub use state::{build_source, AppState, SourceKind};

use config::ServerConfig;

/// Assemble the router. Only GET (and HEAD) is routed; other methods get 405.
pub fn build_router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/api/status", get(api::status))
        .route("/*path", get(api::query_container))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if server.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
