//! # Predicate Evaluation
//!
//! Every present filter field of a [`QuerySpec`] contributes one [`Atom`];
//! a record matches when all atoms hold. A missing field or a value of the
//! wrong type fails the atom.

use super::QuerySpec;
use crate::record::{fields, Record};

/// A single test contributed by one present query field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Title(String),
    Year(i64),
    MinYear(i64),
    MaxYear(i64),
    MinAwards(i64),
    MaxAwards(i64),
    Nominations(i64),
    IsBestPicture(bool),
}

impl Atom {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Atom::Title(expected) => titles_match(record.str_field(fields::TITLE), expected),
            Atom::Year(y) => record.int_field(fields::YEAR) == Some(*y),
            Atom::MinYear(min) => record.int_field(fields::YEAR).is_some_and(|y| y >= *min),
            Atom::MaxYear(max) => record.int_field(fields::YEAR).is_some_and(|y| y <= *max),
            Atom::MinAwards(min) => record.int_field(fields::AWARDS).is_some_and(|a| a >= *min),
            Atom::MaxAwards(max) => record.int_field(fields::AWARDS).is_some_and(|a| a <= *max),
            Atom::Nominations(n) => record.int_field(fields::NOMINATIONS) == Some(*n),
            Atom::IsBestPicture(b) => record.bool_field(fields::IS_BEST_PICTURE) == Some(*b),
        }
    }
}

/// Conjunction of atoms. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    atoms: Vec<Atom>,
}

impl Predicate {
    pub fn from_spec(spec: &QuerySpec) -> Self {
        let mut atoms = Vec::new();
        if let Some(title) = &spec.title {
            atoms.push(Atom::Title(title.clone()));
        }
        if let Some(y) = spec.year {
            atoms.push(Atom::Year(y));
        }
        if let Some(y) = spec.min_year {
            atoms.push(Atom::MinYear(y));
        }
        if let Some(y) = spec.max_year {
            atoms.push(Atom::MaxYear(y));
        }
        if let Some(a) = spec.min_awards {
            atoms.push(Atom::MinAwards(a));
        }
        if let Some(a) = spec.max_awards {
            atoms.push(Atom::MaxAwards(a));
        }
        if let Some(n) = spec.nominations {
            atoms.push(Atom::Nominations(n));
        }
        if let Some(b) = spec.is_best_picture {
            atoms.push(Atom::IsBestPicture(b));
        }
        Self { atoms }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.atoms.iter().all(|atom| atom.matches(record))
    }
}

fn is_blank(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}

/// Case-insensitive equality; a blank side never matches.
fn titles_match(actual: Option<&str>, expected: &str) -> bool {
    match actual {
        Some(actual) if !is_blank(actual) && !is_blank(expected) => actual
            .chars()
            .flat_map(char::to_lowercase)
            .eq(expected.chars().flat_map(char::to_lowercase)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parser;

    fn parasite() -> Record {
        Record::new()
            .with(fields::TITLE, "Parasite")
            .with(fields::YEAR, 2019i64)
            .with(fields::AWARDS, 4i64)
            .with(fields::NOMINATIONS, 6i64)
            .with(fields::IS_BEST_PICTURE, true)
            .with(fields::NUMBER_OF_REFERENCES, 8855i64)
    }

    fn predicate(params: &[(&str, &str)]) -> Predicate {
        Predicate::from_spec(&parser::parse(params.iter().copied()).unwrap())
    }

    #[test]
    fn test_empty_predicate_matches_everything() {
        let p = predicate(&[]);
        assert!(p.is_empty());
        assert!(p.matches(&parasite()));
        assert!(p.matches(&Record::new()));
    }

    #[test]
    fn test_sort_and_limit_contribute_no_atoms() {
        assert!(predicate(&[("sortBy", "year"), ("limit", "3")]).is_empty());
    }

    #[test]
    fn test_title_case_insensitive() {
        assert!(predicate(&[("title", "parasite")]).matches(&parasite()));
        assert!(predicate(&[("title", "PARASITE")]).matches(&parasite()));
        assert!(!predicate(&[("title", "Parasit")]).matches(&parasite()));
        assert!(!predicate(&[("title", " Parasite")]).matches(&parasite()));
    }

    #[test]
    fn test_blank_titles_never_match() {
        let blank = Record::new().with(fields::TITLE, "   ");
        assert!(!predicate(&[("title", "   ")]).matches(&blank));
        assert!(!predicate(&[("title", "")]).matches(&Record::new().with(fields::TITLE, "")));
        assert!(!predicate(&[("title", "Parasite")]).matches(&Record::new()));
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let r = parasite();
        assert!(predicate(&[("minYear", "2019"), ("maxYear", "2019")]).matches(&r));
        assert!(predicate(&[("minAwards", "4"), ("maxAwards", "4")]).matches(&r));
        assert!(!predicate(&[("minYear", "2020")]).matches(&r));
        assert!(!predicate(&[("maxAwards", "3")]).matches(&r));
    }

    #[test]
    fn test_contradictory_range_matches_nothing() {
        let p = predicate(&[("minYear", "2003"), ("maxYear", "2000")]);
        assert!(!p.matches(&parasite()));
        assert!(!p.matches(&Record::new().with(fields::YEAR, 2001i64)));
    }

    #[test]
    fn test_exact_fields() {
        let r = parasite();
        assert!(predicate(&[("year", "2019"), ("nominations", "6")]).matches(&r));
        assert!(!predicate(&[("nominations", "7")]).matches(&r));
        assert!(predicate(&[("isBestPicture", "TRUE")]).matches(&r));
        assert!(!predicate(&[("isBestPicture", "yes")]).matches(&r));
    }

    #[test]
    fn test_missing_or_mistyped_field_fails_atom() {
        let stringly = Record::new()
            .with(fields::TITLE, "Parasite")
            .with(fields::YEAR, "2019")
            .with(fields::IS_BEST_PICTURE, "true");
        assert!(!predicate(&[("year", "2019")]).matches(&stringly));
        assert!(!predicate(&[("minYear", "0")]).matches(&stringly));
        assert!(!predicate(&[("isBestPicture", "true")]).matches(&stringly));
        assert!(!predicate(&[("minAwards", "0")]).matches(&stringly));
        assert!(!predicate(&[("isBestPicture", "false")]).matches(&Record::new()));
    }

    #[test]
    fn test_negative_bounds_flow_through() {
        assert!(predicate(&[("minAwards", "-3")]).matches(&parasite()));
        assert!(!predicate(&[("maxAwards", "-1")]).matches(&parasite()));
    }
}
