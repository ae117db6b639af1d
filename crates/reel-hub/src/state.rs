// =============================================================================
// Application State
// =============================================================================

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use reel_core::{CancelToken, Engine, QueryError, RecordSource};
use reel_io::{ContentTree, DirectorySource, LoadError};

use crate::config::{Config, SourceConfig};

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    ContentTree,
    Directory,
}

/// Shared, read-only state behind every handler.
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
    pub source_kind: SourceKind,
    pub engine: Engine,
    pub container_resource_type: Option<String>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(source: Arc<dyn RecordSource>, source_kind: SourceKind, config: &Config) -> Self {
        Self {
            source,
            source_kind,
            engine: Engine::new(config.query.limit_mode),
            container_resource_type: config.query.required_resource_type().map(str::to_string),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Build the record source from `config.source` and wrap it in state.
    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        let (source, kind) = build_source(&config.source)?;
        Ok(Self::new(source, kind, config))
    }

    /// Run one query synchronously. Call from a blocking task.
    pub fn run_query(
        &self,
        container: &str,
        params: &[(String, String)],
        cancel: &CancelToken,
    ) -> Result<Vec<u8>, QueryError> {
        if let Some(required) = &self.container_resource_type {
            let actual = self.source.resource_type(container)?;
            if actual.as_deref() != Some(required.as_str()) {
                tracing::debug!(
                    container,
                    required = %required,
                    actual = ?actual,
                    "container resource type does not match"
                );
                return Err(QueryError::ContainerNotFound(container.to_string()));
            }
        }
        self.engine.run(
            self.source.as_ref(),
            container,
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            cancel,
        )
    }
}

/// Open the configured record source. A directory wins over file mounts.
pub fn build_source(
    config: &SourceConfig,
) -> Result<(Arc<dyn RecordSource>, SourceKind), LoadError> {
    if let Some(dir) = &config.directory {
        if !config.mounts.is_empty() {
            tracing::warn!(
                directory = %dir.display(),
                mounts = config.mounts.len(),
                "both a content directory and file mounts are configured; ignoring mounts"
            );
        }
        let source = DirectorySource::open(dir)?;
        tracing::info!(directory = %dir.display(), "serving films from directory");
        return Ok((Arc::new(source), SourceKind::Directory));
    }

    let mut tree = ContentTree::new();
    for mount in &config.mounts {
        tree.mount_file(&mount.path, &mount.file)?;
    }
    if config.mounts.is_empty() {
        tracing::warn!("no content mounted; every container will answer 404");
    }
    Ok((Arc::new(tree), SourceKind::ContentTree))
}
