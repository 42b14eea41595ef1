//! # WyvernDB
//!
//! Static site generator for the WyvernDB card database. Card and set
//! records live as one JSON document each; page templates turn them into a
//! browsable site with a page per card, a page per set, and a handful of
//! top-level pages.
//!
//! # Architecture
//!
//! ```text
//! 1. Load       data/cards, data/sets  →  Catalog
//! 2. Index      Catalog                →  SiteIndex (reprints, id lists)
//! 3. Stage      wyverndb.js, data/     →  docs/
//! 4. Manifests  SiteIndex              →  docs/data/cards.json, sets.json
//! 5. Generate   templates + Catalog    →  docs/*.html
//! ```
//!
//! Every step after loading is a pure function of the catalog, so two builds
//! from the same inputs produce byte-identical output. Record ids are the
//! output file names, which keeps card URLs stable across rebuilds.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Reads card and set documents into an id-keyed [`load::Catalog`] |
//! | [`index`] | Derived lookups: cards grouped by name, id lists for manifests |
//! | [`stage`] | Copies the client script and raw data into the output |
//! | [`manifest`] | Writes the card and set id lists the search script fetches |
//! | [`generate`] | Renders the Jinja page templates with minijinja |
//! | [`helpers`] | Functions exposed to templates (labels, `len`, `list`, `repr`) |
//! | [`pipeline`] | Runs the steps above in order for `build` and `check` |
//! | [`config`] | Optional `wyverndb.toml` loading, merging, and validation |
//! | [`types`] | Card and set records plus the enum label tables |
//! | [`output`] | CLI output formatting |
//!
//! # Templates
//!
//! Templates are plain Jinja files next to the data, not compiled in. They are
//! rendered without autoescaping, since the record text is trusted and already
//! contains the markup the pages want.

pub mod config;
pub mod generate;
pub mod helpers;
pub mod index;
pub mod load;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod stage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
