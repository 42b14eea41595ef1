//! Record loading.
//!
//! Stage 1 of the build. Reads every card and set document from its
//! directory and keys it by the `id` it declares:
//!
//! ```text
//! data/
//! ├── cards/
//! │   ├── a1.json      {"id": "a1", "name": "Dragon Whelp", "set": "core", ...}
//! │   └── a2.json
//! └── sets/
//!     └── core.json    {"id": "core", "name": "Core Set", ...}
//! ```
//!
//! File names carry no meaning beyond ordering: files are read in sorted
//! file-name order and that order is kept by the resulting [`Catalog`], so
//! manifests, the name index, and rendering all come out the same on every
//! run. Hidden files (leading `.`) and subdirectories are skipped.
//!
//! Any unreadable file, malformed document, or repeated id aborts loading;
//! nothing has been written at that point.

use crate::types::{Card, Record, Set};
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {kind} document {}: {source}", path.display())]
    Parse {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate {kind} id `{id}` in {} and {}", first.display(), second.display())]
    DuplicateId {
        kind: &'static str,
        id: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// A card's `set` does not name a loaded set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("card `{card}` has no set")]
    MissingSet { card: String },
    #[error("card `{card}` references unknown set `{set}`")]
    UnknownSet { card: String, set: String },
}

/// Records keyed by id, in load order, with the file each came from.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    records: IndexMap<String, R>,
    sources: IndexMap<String, PathBuf>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: IndexMap::new(),
            sources: IndexMap::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    /// Insert a record, rejecting an id that was already loaded.
    pub fn insert(&mut self, record: R, source: PathBuf) -> Result<(), LoadError> {
        match self.records.entry(record.id().to_string()) {
            Entry::Occupied(existing) => Err(LoadError::DuplicateId {
                kind: R::KIND,
                id: existing.key().clone(),
                first: self.sources[existing.key()].clone(),
                second: source,
            }),
            Entry::Vacant(slot) => {
                self.sources.insert(slot.key().clone(), source);
                slot.insert(record);
                Ok(())
            }
        }
    }
}

impl<R> Collection<R> {
    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &R> {
        self.records.values()
    }

    /// File a record was loaded from.
    pub fn source(&self, id: &str) -> Option<&Path> {
        self.sources.get(id).map(PathBuf::as_path)
    }

    /// The id → record map, as handed to templates.
    pub fn as_map(&self) -> &IndexMap<String, R> {
        &self.records
    }
}

/// Everything read from the data directory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub cards: Collection<Card>,
    pub sets: Collection<Set>,
}

impl Catalog {
    /// The set a card belongs to.
    pub fn resolve_set(&self, card: &Card) -> Result<&Set, ReferenceError> {
        let set_id = card.set.as_deref().ok_or_else(|| ReferenceError::MissingSet {
            card: card.id.clone(),
        })?;
        self.sets
            .get(set_id)
            .ok_or_else(|| ReferenceError::UnknownSet {
                card: card.id.clone(),
                set: set_id.to_string(),
            })
    }

    /// Pair every card with its set, in card order, failing on the first
    /// dangling reference.
    pub fn card_sets(&self) -> Result<Vec<(&Card, &Set)>, ReferenceError> {
        self.cards
            .values()
            .map(|card| self.resolve_set(card).map(|set| (card, set)))
            .collect()
    }
}

/// Load all cards and sets.
pub fn load_catalog(cards_dir: &Path, sets_dir: &Path) -> Result<Catalog, LoadError> {
    let cards = load_records(cards_dir)?;
    let sets = load_records(sets_dir)?;
    Ok(Catalog { cards, sets })
}

/// Load every document in `dir` as a record of kind `R`.
pub fn load_records<R: Record>(dir: &Path) -> Result<Collection<R>, LoadError> {
    let mut collection = Collection::default();
    for path in collect_documents(dir)? {
        let content = fs::read_to_string(&path).map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;
        let record: R = serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            kind: R::KIND,
            path: path.clone(),
            source,
        })?;
        tracing::debug!(kind = R::KIND, id = record.id(), path = %path.display(), "loaded record");
        collection.insert(record, path)?;
    }
    Ok(collection)
}

/// Regular, non-hidden files in `dir`, sorted by file name.
fn collect_documents(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let read_err = |source| LoadError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
