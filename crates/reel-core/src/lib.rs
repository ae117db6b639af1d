//! # reel-core — The "Engine" of REEL
//!
//! A read-only query engine over Oscar film records. Records live beneath a
//! container resource and are plain property bags; a request's parameters
//! select, order and cap them, and the survivors are rendered as
//! `{"results": [...]}` with storage metadata stripped.
//!
//! The engine holds no state between calls. Everything a request needs
//! (its [`QuerySpec`], working buffers and [`CancelToken`]) is local to that
//! call, so any number of evaluations may run in parallel.
//!
//! ```text
//! params ─► parser ─► QuerySpec ─► RecordSource ─► filter ─► sort ─► limit ─► project ─► JSON
//! ```

pub mod cancel;
pub mod error;
pub mod query;
pub mod record;
pub mod source;

pub use cancel::{CancelOnDrop, CancelToken};
pub use error::{ErrorKind, QueryError};
pub use query::output::{render, CONTENT_TYPE};
pub use query::{Engine, LimitMode, QueryResults, QuerySpec, SortKey};
pub use record::{fields, is_storage_key, Record, Scalar, STORAGE_PREFIXES};
pub use source::{MemorySource, RecordSource, Records};
