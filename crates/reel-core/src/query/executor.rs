//! # Query Executor
//!
//! Evaluates a [`QuerySpec`] against the children of one container:
//! filter, stable sort, truncate, then project.

use std::cmp::Ordering;
use std::time::Instant;

use super::predicate::Predicate;
use super::{LimitMode, QuerySpec, SortKey};
use crate::cancel::CancelToken;
use crate::error::QueryError;
use crate::record::{fields, Record};
use crate::source::RecordSource;

/// Execute `spec` against `container`, returning projected records.
///
/// The token is checked before each record is consumed; once cancelled,
/// evaluation stops and nothing is returned.
pub fn execute(
    source: &dyn RecordSource,
    container: &str,
    spec: &QuerySpec,
    mode: LimitMode,
    cancel: &CancelToken,
) -> Result<Vec<Record>, QueryError> {
    let start = Instant::now();
    let predicate = Predicate::from_spec(spec);
    let limit = spec.effective_limit();

    let mut matched: Vec<Record> = Vec::new();
    let mut scanned = 0usize;

    for item in source.children(container)? {
        if cancel.is_cancelled() {
            return Err(QueryError::Cancelled);
        }
        if mode == LimitMode::BeforeSort && limit.is_some_and(|n| matched.len() >= n) {
            break;
        }
        let record = item?;
        scanned += 1;
        if predicate.matches(&record) {
            matched.push(record);
        }
    }

    if cancel.is_cancelled() {
        return Err(QueryError::Cancelled);
    }

    let total = matched.len();
    sort_records(&mut matched, spec.sort_by);
    if let Some(n) = limit {
        matched.truncate(n);
    }

    tracing::debug!(
        container,
        scanned,
        matched = total,
        returned = matched.len(),
        sort_by = %spec.sort_by,
        elapsed_us = start.elapsed().as_micros() as u64,
        "query evaluated"
    );

    Ok(matched.into_iter().map(Record::projected).collect())
}

/// Stable ascending sort by `key`. Records lacking a comparable key go last,
/// in source order.
pub fn sort_records(records: &mut [Record], key: SortKey) {
    match key {
        SortKey::Title => records.sort_by(|a, b| {
            missing_last(a.str_field(fields::TITLE), b.str_field(fields::TITLE))
        }),
        numeric => {
            let field = numeric.field();
            records.sort_by(|a, b| missing_last(a.int_field(field), b.int_field(field)))
        }
    }
}

fn missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
