//! # Content Tree
//!
//! An immutable, in-memory resource tree. Each mounted JSON document becomes
//! a subtree: a JSON object is a resource, its scalar members are the
//! resource's properties and its object members are child resources, kept
//! in document order.
//!
//! ```text
//! /                       (implicit)
//! └── content             (implicit)
//!     └── oscars          ← oscars.json root, sling:resourceType = test/filmEntryContainer
//!         ├── parasite    ← one film record
//!         └── green-book
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use reel_core::{fields, QueryError, Record, RecordSource, Records};

use crate::error::LoadError;
use crate::props::record_from_object;

#[derive(Debug, Clone, Default)]
struct Node {
    properties: Record,
    /// Absolute paths of direct children, in document order.
    children: Vec<String>,
}

/// Resource tree addressed by absolute path.
#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: BTreeMap<String, Node>,
}

impl Default for ContentTree {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::default());
        Self { nodes }
    }
}

impl ContentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `json` and mount its root object at `mount`.
    pub fn mount_str(&mut self, mount: &str, json: &str) -> Result<(), LoadError> {
        let doc: Value = serde_json::from_str(json).map_err(|source| LoadError::Parse {
            path: mount.into(),
            source,
        })?;
        self.mount(mount, &doc)
    }

    /// Read a JSON content file and mount its root object at `mount`.
    pub fn mount_file(&mut self, mount: &str, file: &Path) -> Result<(), LoadError> {
        let bytes = std::fs::read(file).map_err(|source| LoadError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        let doc: Value = serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
            path: file.to_path_buf(),
            source,
        })?;
        self.mount(mount, &doc)?;
        tracing::info!(mount, file = %file.display(), "mounted content file");
        Ok(())
    }

    /// Mount a parsed document at `mount`, creating missing ancestors.
    pub fn mount(&mut self, mount: &str, doc: &Value) -> Result<(), LoadError> {
        let segments = split_path(mount).ok_or_else(|| LoadError::InvalidMountPath(mount.into()))?;
        let object = doc
            .as_object()
            .ok_or_else(|| LoadError::NotAnObject(mount.into()))?;
        let path = join_segments(&segments);
        if self.nodes.contains_key(&path) {
            return Err(LoadError::MountConflict(path));
        }

        let mut parent = "/".to_string();
        for depth in 1..segments.len() {
            let ancestor = join_segments(&segments[..depth]);
            if !self.nodes.contains_key(&ancestor) {
                self.nodes.insert(ancestor.clone(), Node::default());
                self.link(&parent, &ancestor);
            }
            parent = ancestor;
        }

        self.insert_resource(&path, object);
        self.link(&parent, &path);
        Ok(())
    }

    /// Number of resources, including implicit ancestors and the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Properties of the resource at `path`.
    pub fn properties(&self, path: &str) -> Option<&Record> {
        self.nodes.get(path).map(|node| &node.properties)
    }

    fn link(&mut self, parent: &str, child: &str) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child.to_string());
        }
    }

    fn insert_resource(&mut self, path: &str, object: &Map<String, Value>) {
        let mut node = Node {
            properties: record_from_object(object, path),
            children: Vec::new(),
        };
        for (name, value) in object {
            if let Value::Object(child) = value {
                let child_path = child_path(path, name);
                self.insert_resource(&child_path, child);
                node.children.push(child_path);
            }
        }
        self.nodes.insert(path.to_string(), node);
    }
}

impl RecordSource for ContentTree {
    fn children<'a>(&'a self, container: &str) -> Result<Records<'a>, QueryError> {
        let node = self
            .nodes
            .get(container)
            .ok_or_else(|| QueryError::ContainerNotFound(container.to_string()))?;
        let records = node.children.iter().map(move |child| {
            self.nodes
                .get(child)
                .map(|n| n.properties.clone())
                .ok_or_else(|| QueryError::Source(format!("dangling child resource {child}")))
        });
        Ok(Box::new(records))
    }

    fn resource_type(&self, container: &str) -> Result<Option<String>, QueryError> {
        Ok(self
            .properties(container)
            .and_then(|p| p.str_field(fields::RESOURCE_TYPE))
            .map(str::to_string))
    }

    fn containers(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|(_, node)| !node.children.is_empty())
            .map(|(path, _)| path.clone())
            .collect()
    }
}

/// Split an absolute path into segments. `None` for relative paths and
/// empty, `.` or `..` segments.
fn split_path(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return Some(Vec::new());
    }
    let segments: Vec<&str> = rest.split('/').collect();
    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == "..")
    {
        return None;
    }
    Some(segments)
}

fn join_segments(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

fn child_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}
