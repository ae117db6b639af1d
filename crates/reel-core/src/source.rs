//! # Record Sources
//!
//! The engine reads films through [`RecordSource`]. A source maps a container
//! path to the sequence of its child records; iteration order is the source's
//! own and carries no meaning beyond breaking sort ties.

use std::collections::BTreeMap;

use crate::error::QueryError;
use crate::record::Record;

/// Lazily produced child records of one container.
pub type Records<'a> = Box<dyn Iterator<Item = Result<Record, QueryError>> + Send + 'a>;

/// Anything that can enumerate the films beneath a container.
pub trait RecordSource: Send + Sync {
    /// Child records of `container`.
    ///
    /// Returns [`QueryError::ContainerNotFound`] if the container is absent.
    /// An existing container without children yields an empty iterator.
    fn children<'a>(&'a self, container: &str) -> Result<Records<'a>, QueryError>;

    /// Resource type of `container`, if the source tracks one.
    fn resource_type(&self, _container: &str) -> Result<Option<String>, QueryError> {
        Ok(None)
    }

    /// Known container paths, for diagnostics.
    fn containers(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A plain in-memory source: container path → records.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    containers: BTreeMap<String, Vec<Record>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container, replacing any previous records at `path`.
    pub fn insert(&mut self, path: impl Into<String>, records: Vec<Record>) {
        self.containers.insert(path.into(), records);
    }

    pub fn with_container(mut self, path: impl Into<String>, records: Vec<Record>) -> Self {
        self.insert(path, records);
        self
    }
}

impl RecordSource for MemorySource {
    fn children<'a>(&'a self, container: &str) -> Result<Records<'a>, QueryError> {
        let records = self
            .containers
            .get(container)
            .ok_or_else(|| QueryError::ContainerNotFound(container.to_string()))?;
        Ok(Box::new(records.iter().cloned().map(Ok)))
    }

    fn containers(&self) -> Vec<String> {
        self.containers.keys().cloned().collect()
    }
}
