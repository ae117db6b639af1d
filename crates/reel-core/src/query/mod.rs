//! # Film Query Engine
//!
//! Turns a request's raw parameters into a [`QuerySpec`], evaluates it against
//! the children of one container and renders `{"results": [...]}`.
//!
//! Pipeline: parse → filter → sort → truncate → project → serialize.

pub mod executor;
pub mod output;
pub mod parser;
pub mod predicate;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::error::QueryError;
use crate::record::fields;
use crate::source::RecordSource;

pub use output::QueryResults;

/// A parsed, validated film query. Built per request, never shared mutably.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    /// Exact title, compared case-insensitively.
    pub title: Option<String>,
    pub year: Option<i64>,
    pub min_year: Option<i64>,
    pub max_year: Option<i64>,
    pub min_awards: Option<i64>,
    pub max_awards: Option<i64>,
    pub nominations: Option<i64>,
    pub is_best_picture: Option<bool>,
    #[serde(default)]
    pub sort_by: SortKey,
    /// Maximum result count. Negative values impose no cap.
    pub limit: Option<i64>,
}

impl QuerySpec {
    /// The limit as a result cap, if one applies.
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.and_then(|n| usize::try_from(n).ok())
    }
}

/// Sort key for the result list. Ascending, stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Title,
    Year,
    Awards,
    Nominations,
}

impl SortKey {
    /// Record property the key sorts on.
    pub fn field(&self) -> &'static str {
        match self {
            SortKey::Title => fields::TITLE,
            SortKey::Year => fields::YEAR,
            SortKey::Awards => fields::AWARDS,
            SortKey::Nominations => fields::NOMINATIONS,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    /// Exact, case-sensitive match on the four key names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortKey::Title),
            "year" => Ok(SortKey::Year),
            "awards" => Ok(SortKey::Awards),
            "nominations" => Ok(SortKey::Nominations),
            other => Err(QueryError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Where truncation to `limit` happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitMode {
    /// First N of the fully sorted result.
    #[default]
    AfterSort,
    /// Stop scanning after N matches in source order, then sort those.
    /// Matches the legacy endpoint.
    BeforeSort,
}

/// Stateless query engine. Holds configuration only and is freely shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    limit_mode: LimitMode,
}

impl Engine {
    pub fn new(limit_mode: LimitMode) -> Self {
        Self { limit_mode }
    }

    pub fn limit_mode(&self) -> LimitMode {
        self.limit_mode
    }

    /// Evaluate an already parsed query and return the projected records.
    pub fn evaluate(
        &self,
        source: &dyn RecordSource,
        container: &str,
        spec: &QuerySpec,
        cancel: &CancelToken,
    ) -> Result<QueryResults, QueryError> {
        let results = executor::execute(source, container, spec, self.limit_mode, cancel)?;
        Ok(QueryResults { results })
    }

    /// Parse `params`, evaluate against `container` and render the JSON body.
    pub fn run<I, K, V>(
        &self,
        source: &dyn RecordSource,
        container: &str,
        params: I,
        cancel: &CancelToken,
    ) -> Result<Vec<u8>, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let spec = parser::parse(params)?;
        let results = self.evaluate(source, container, &spec, cancel)?;
        if cancel.is_cancelled() {
            return Err(QueryError::Cancelled);
        }
        output::render(&results)
    }
}
