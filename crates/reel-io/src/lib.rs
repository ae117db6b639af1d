//! # reel-io — The "Shelf" of REEL
//!
//! Record sources for the query engine:
//!
//! - [`ContentTree`]: an in-memory resource tree built from Sling-style JSON
//!   content files, each mounted at a path (e.g. `oscars.json` at
//!   `/content/oscars`).
//! - [`DirectorySource`]: a directory per container, one `*.json` file per
//!   film, read lazily on every query.

pub mod dir;
pub mod error;
pub mod props;
pub mod tree;

pub use dir::DirectorySource;
pub use error::LoadError;
pub use tree::ContentTree;
