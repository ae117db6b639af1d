//! Loads the shared Oscar fixture and runs the engine over it.

use std::path::PathBuf;

use reel_core::{CancelToken, Engine, LimitMode, QueryResults, RecordSource};
use reel_io::ContentTree;

const OSCARS: &str = "/content/oscars";

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/oscars.json")
}

fn tree() -> ContentTree {
    let mut tree = ContentTree::new();
    tree.mount_file(OSCARS, &fixture()).unwrap();
    tree
}

fn query(tree: &ContentTree, engine: Engine, params: &[(&str, &str)]) -> Vec<String> {
    let body = engine
        .run(tree, OSCARS, params.iter().copied(), &CancelToken::new())
        .unwrap();
    let parsed: QueryResults = serde_json::from_slice(&body).unwrap();
    parsed
        .results
        .iter()
        .map(|r| r.str_field("title").unwrap().to_string())
        .collect()
}

#[test]
fn test_fixture_loads_every_film_in_document_order() {
    let tree = tree();
    let titles: Vec<String> = tree
        .children(OSCARS)
        .unwrap()
        .map(|r| r.unwrap().str_field("title").unwrap().to_string())
        .collect();
    assert_eq!(titles.len(), 26);
    assert_eq!(titles.first().map(String::as_str), Some("Wings"));
    assert_eq!(
        titles.last().map(String::as_str),
        Some("Everything Everywhere All at Once")
    );
}

#[test]
fn test_nominations_sort_breaks_ties_by_document_order() {
    let titles = query(
        &tree(),
        Engine::default(),
        &[
            ("minYear", "2018"),
            ("minAwards", "3"),
            ("sortBy", "nominations"),
            ("limit", "4"),
        ],
    );
    assert_eq!(
        titles,
        vec!["Bohemian Rhapsody", "Green Book", "Parasite", "Black Panther"]
    );
}

#[test]
fn test_legacy_limit_mode_truncates_in_document_order() {
    let titles = query(
        &tree(),
        Engine::new(LimitMode::BeforeSort),
        &[
            ("minYear", "2018"),
            ("minAwards", "3"),
            ("sortBy", "nominations"),
            ("limit", "4"),
        ],
    );
    // Roma, Bohemian Rhapsody, Green Book and Parasite are the first four
    // matches in the file.
    assert_eq!(
        titles,
        vec!["Bohemian Rhapsody", "Green Book", "Parasite", "Roma"]
    );
}
