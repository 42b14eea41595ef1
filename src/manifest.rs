//! Id manifests for client-side search and browse.
//!
//! Two flat JSON arrays, `cards.json` and `sets.json`, written under the
//! manifest directory of the output root. The script on the search page
//! fetches them to know which card and set pages exist.

use crate::config::ManifestsConfig;
use crate::index::SiteIndex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("cannot write manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Paths of the written manifests.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenManifests {
    pub cards: PathBuf,
    pub sets: PathBuf,
}

pub fn write_manifests(
    index: &SiteIndex,
    config: &ManifestsConfig,
    output_dir: &Path,
) -> Result<WrittenManifests, ManifestError> {
    let dir = output_dir.join(&config.dir);
    fs::create_dir_all(&dir).map_err(|source| ManifestError::Io {
        path: dir.clone(),
        source,
    })?;

    let cards = dir.join(&config.cards);
    write_id_list(&cards, &index.card_ids)?;
    let sets = dir.join(&config.sets);
    write_id_list(&sets, &index.set_ids)?;

    Ok(WrittenManifests { cards, sets })
}

fn write_id_list(path: &Path, ids: &[String]) -> Result<(), ManifestError> {
    let json = serde_json::to_string(ids)?;
    fs::write(path, json).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), count = ids.len(), "wrote manifest");
    Ok(())
}
