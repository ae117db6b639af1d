//! Response body: `{"results": [...]}`.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::record::Record;

/// Media type of every rendered body.
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// The query response document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResults {
    pub results: Vec<Record>,
}

/// Serialize results to compact JSON bytes.
pub fn render(results: &QueryResults) -> Result<Vec<u8>, QueryError> {
    Ok(serde_json::to_vec(results)?)
}
