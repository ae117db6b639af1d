//! # Directory Source
//!
//! Containers are directories below a root; each `*.json` file directly
//! inside a container directory is one film. Files are read lazily while the
//! engine iterates, in file-name order. An optional `.content.json` carries
//! the container's own properties (its resource type).
//!
//! ```text
//! <root>/content/oscars/.content.json   {"sling:resourceType": "test/filmEntryContainer"}
//! <root>/content/oscars/parasite.json   {"title": "Parasite", "year": 2019, ...}
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use reel_core::{fields, QueryError, Record, RecordSource, Records};

use crate::error::LoadError;
use crate::props::record_from_object;

/// File holding a container's own properties.
pub const CONTAINER_PROPERTIES_FILE: &str = ".content.json";

/// Record source backed by a directory tree.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(LoadError::MissingDirectory(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a container path to a directory. `None` if the path escapes the
    /// root or is not absolute.
    fn resolve(&self, container: &str) -> Option<PathBuf> {
        let rest = container.strip_prefix('/')?;
        let mut dir = self.root.clone();
        if rest.is_empty() {
            return Some(dir);
        }
        for segment in rest.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return None;
            }
            dir.push(segment);
        }
        Some(dir)
    }

    fn container_dir(&self, container: &str) -> Result<PathBuf, QueryError> {
        self.resolve(container)
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| QueryError::ContainerNotFound(container.to_string()))
    }

    fn collect_containers(&self, dir: &Path, path: &str, out: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        let mut has_records = false;
        let mut subdirs = Vec::new();
        for entry in entries.flatten() {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                subdirs.push(entry.file_name().to_string_lossy().into_owned());
            } else if is_record_file(&entry_path) {
                has_records = true;
            }
        }
        if has_records {
            out.push(path.to_string());
        }
        subdirs.sort();
        for name in subdirs {
            let child = if path == "/" {
                format!("/{name}")
            } else {
                format!("{path}/{name}")
            };
            self.collect_containers(&dir.join(&name), &child, out);
        }
    }
}

impl RecordSource for DirectorySource {
    fn children<'a>(&'a self, container: &str) -> Result<Records<'a>, QueryError> {
        let dir = self.container_dir(container)?;
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if is_record_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        tracing::trace!(container, files = files.len(), "listing directory container");
        Ok(Box::new(files.into_iter().map(|path| read_record(&path))))
    }

    fn resource_type(&self, container: &str) -> Result<Option<String>, QueryError> {
        let Some(dir) = self.resolve(container) else {
            return Ok(None);
        };
        let props_file = dir.join(CONTAINER_PROPERTIES_FILE);
        if !props_file.is_file() {
            return Ok(None);
        }
        let record = read_record(&props_file)?;
        Ok(record.str_field(fields::RESOURCE_TYPE).map(str::to_string))
    }

    fn containers(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_containers(&self.root, "/", &mut out);
        out
    }
}

fn is_record_file(path: &Path) -> bool {
    path.is_file()
        && path.extension().is_some_and(|ext| ext == "json")
        && path
            .file_name()
            .is_some_and(|name| name != CONTAINER_PROPERTIES_FILE)
}

fn read_record(path: &Path) -> Result<Record, QueryError> {
    let bytes = fs::read(path)?;
    let value: Value = serde_json::from_slice(&bytes)?;
    let object = value.as_object().ok_or_else(|| {
        QueryError::Source(format!("{}: expected a JSON object", path.display()))
    })?;
    Ok(record_from_object(object, &path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::ErrorKind;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn setup() -> (tempfile::TempDir, DirectorySource) {
        let tmp = tempdir().unwrap();
        let oscars = tmp.path().join("content").join("oscars");
        fs::create_dir_all(&oscars).unwrap();
        write(
            &oscars,
            CONTAINER_PROPERTIES_FILE,
            r#"{"jcr:primaryType": "nt:unstructured", "sling:resourceType": "test/filmEntryContainer"}"#,
        );
        write(
            &oscars,
            "b-parasite.json",
            r#"{"jcr:primaryType": "nt:unstructured", "title": "Parasite", "year": 2019, "awards": 4}"#,
        );
        write(
            &oscars,
            "a-green-book.json",
            r#"{"title": "Green Book", "year": 2018, "awards": 3}"#,
        );
        write(&oscars, "README.txt", "not a record");
        fs::create_dir_all(tmp.path().join("content").join("empty")).unwrap();
        let source = DirectorySource::open(tmp.path()).unwrap();
        (tmp, source)
    }

    #[test]
    fn test_reads_records_in_file_name_order() {
        let (_tmp, source) = setup();
        let titles: Vec<String> = source
            .children("/content/oscars")
            .unwrap()
            .map(|r| r.unwrap().str_field("title").unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["Green Book", "Parasite"]);
    }

    #[test]
    fn test_resource_type_from_properties_file() {
        let (_tmp, source) = setup();
        assert_eq!(
            source.resource_type("/content/oscars").unwrap().as_deref(),
            Some("test/filmEntryContainer")
        );
        assert_eq!(source.resource_type("/content/empty").unwrap(), None);
    }

    #[test]
    fn test_empty_and_missing_containers() {
        let (_tmp, source) = setup();
        assert_eq!(source.children("/content/empty").unwrap().count(), 0);
        let err = source.children("/content/none").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_path_escape_is_not_found() {
        let (_tmp, source) = setup();
        for path in ["/content/../content/oscars", "content/oscars", "/content//oscars"] {
            let err = source.children(path).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::NotFound, "{path}");
        }
    }

    #[test]
    fn test_corrupt_file_is_internal_error() {
        let (tmp, source) = setup();
        write(
            &tmp.path().join("content").join("oscars"),
            "c-broken.json",
            "{ \"title\": ",
        );
        let results: Vec<Result<Record, QueryError>> =
            source.children("/content/oscars").unwrap().collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert_eq!(results[2].as_ref().unwrap_err().kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_non_object_file_is_internal_error() {
        let (tmp, source) = setup();
        write(&tmp.path().join("content").join("oscars"), "z-list.json", "[1, 2]");
        let last = source.children("/content/oscars").unwrap().last().unwrap();
        assert_eq!(last.unwrap_err().kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_containers() {
        let (_tmp, source) = setup();
        assert_eq!(source.containers(), vec!["/content/oscars".to_string()]);
    }

    #[test]
    fn test_open_missing_root() {
        let tmp = tempdir().unwrap();
        let err = DirectorySource::open(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, LoadError::MissingDirectory(_)));
    }
}
