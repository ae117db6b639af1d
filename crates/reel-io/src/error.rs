//! Errors raised while loading content.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("content root mounted at '{0}' must be a JSON object")]
    NotAnObject(String),

    #[error("invalid mount path '{0}' (expected an absolute path like /content/oscars)")]
    InvalidMountPath(String),

    #[error("mount path '{0}' is already in use")]
    MountConflict(String),

    #[error("content directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),
}
