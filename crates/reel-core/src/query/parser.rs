//! # Query Parameter Parser
//!
//! Parses decoded request parameters into a [`QuerySpec`].
//!
//! Recognized names:
//! ```text
//! title  year  minYear  maxYear  minAwards  maxAwards  nominations
//! isBestPicture  sortBy  limit
//! ```
//! Unknown names are ignored. When a name repeats, the first value wins.

use super::{QuerySpec, SortKey};
use crate::error::QueryError;

/// Parse `(name, value)` pairs into a [`QuerySpec`].
pub fn parse<I, K, V>(params: I) -> Result<QuerySpec, QueryError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut spec = QuerySpec::default();
    let mut sort_by: Option<SortKey> = None;

    for (name, value) in params {
        let raw = value.as_ref();
        match name.as_ref() {
            "title" => {
                if spec.title.is_none() {
                    spec.title = Some(raw.to_string());
                }
            }
            "year" => set_int(&mut spec.year, "year", raw)?,
            "minYear" => set_int(&mut spec.min_year, "minYear", raw)?,
            "maxYear" => set_int(&mut spec.max_year, "maxYear", raw)?,
            "minAwards" => set_int(&mut spec.min_awards, "minAwards", raw)?,
            "maxAwards" => set_int(&mut spec.max_awards, "maxAwards", raw)?,
            "nominations" => set_int(&mut spec.nominations, "nominations", raw)?,
            "limit" => set_int(&mut spec.limit, "limit", raw)?,
            "isBestPicture" => {
                if spec.is_best_picture.is_none() {
                    spec.is_best_picture = Some(parse_lenient_bool(raw));
                }
            }
            "sortBy" => {
                if sort_by.is_none() {
                    sort_by = Some(raw.parse()?);
                }
            }
            other => tracing::trace!(param = other, "ignoring unsupported query parameter"),
        }
    }

    spec.sort_by = sort_by.unwrap_or_default();
    Ok(spec)
}

fn set_int(slot: &mut Option<i64>, name: &'static str, raw: &str) -> Result<(), QueryError> {
    if slot.is_none() {
        *slot = Some(parse_int(name, raw)?);
    }
    Ok(())
}

/// Strict signed decimal. Blank input is malformed, not absent.
fn parse_int(name: &'static str, raw: &str) -> Result<i64, QueryError> {
    raw.parse::<i64>().map_err(|_| QueryError::InvalidParam {
        name,
        value: raw.to_string(),
    })
}

/// `true` in any letter case; every other string is `false`.
fn parse_lenient_bool(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}
