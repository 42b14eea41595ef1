//! Shared test utilities for the wyverndb test suite.
//!
//! Provides fixture setup, record writers, and lookup helpers that panic with
//! a useful message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! write_card(&tmp.path().join("data"), "x1", r#"{"id": "x1", "name": "X", "set": "core"}"#);
//! let catalog = load_fixture_catalog(tmp.path());
//! assert_eq!(find_card(&catalog, "x1").name, "X");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::load::{Catalog, load_catalog};
use crate::types::Card;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    crate::stage::copy_tree(&fixtures, tmp.path()).unwrap();
    tmp
}

/// Load the catalog from a fixture copy's `data/` directory.
pub fn load_fixture_catalog(root: &Path) -> Catalog {
    load_catalog(&root.join("data/cards"), &root.join("data/sets")).unwrap()
}

/// Write `<data_dir>/cards/<stem>.json`.
pub fn write_card(data_dir: &Path, stem: &str, json: &str) {
    write_record(&data_dir.join("cards"), stem, json);
}

/// Write `<data_dir>/sets/<stem>.json`.
pub fn write_set(data_dir: &Path, stem: &str, json: &str) {
    write_record(&data_dir.join("sets"), stem, json);
}

fn write_record(dir: &Path, stem: &str, json: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(format!("{stem}.json")), json).unwrap();
}

/// Read a generated file. Panics if missing.
pub fn read_page(output_dir: &Path, file: &str) -> String {
    fs::read_to_string(output_dir.join(file))
        .unwrap_or_else(|e| panic!("cannot read generated {file}: {e}"))
}

// =========================================================================
// Catalog lookups
// =========================================================================

/// Find a card by id. Panics if not found.
pub fn find_card<'a>(catalog: &'a Catalog, id: &str) -> &'a Card {
    catalog.cards.get(id).unwrap_or_else(|| {
        let ids: Vec<&str> = catalog.cards.ids().collect();
        panic!("card '{id}' not found. Available: {ids:?}")
    })
}
