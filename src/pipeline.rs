//! The build, start to finish.
//!
//! ```text
//! 1. Load       data/cards, data/sets  →  Catalog
//! 2. Index      Catalog                →  SiteIndex (reprints, id lists)
//! 3. Stage      wyverndb.js, data/     →  docs/
//! 4. Manifests  SiteIndex              →  docs/data/cards.json, sets.json
//! 5. Generate   templates + Catalog    →  docs/*.html
//! ```
//!
//! Loading, indexing, and validation touch nothing on disk, so a malformed
//! or duplicate record, a dangling set reference, or an id unusable as a file
//! name stops the build before the output directory is created. Staging
//! runs before the manifests are written so generated manifests win over any
//! stale copies inside the staged data directory.

use crate::config::SiteConfig;
use crate::generate::{self, RenderError, RenderedPage};
use crate::index::{self, SiteIndex};
use crate::load::{self, Catalog, LoadError, ReferenceError};
use crate::manifest::{self, ManifestError, WrittenManifests};
use crate::stage::{self, StageError, StageSummary};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),
    #[error("Staging error: {0}")]
    Stage(#[from] StageError),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub catalog: Catalog,
    pub index: SiteIndex,
    pub staged: StageSummary,
    pub manifests: WrittenManifests,
    pub pages: Vec<RenderedPage>,
    pub output_dir: PathBuf,
}

/// Load and index the catalog, then verify every card's set resolves.
///
/// Writes nothing. Backs the `check` command and the first half of [`build`].
pub fn check(root: &Path, config: &SiteConfig) -> Result<(Catalog, SiteIndex), BuildError> {
    let catalog = load::load_catalog(&config.cards_dir(root), &config.sets_dir(root))?;
    tracing::info!(
        cards = catalog.cards.len(),
        sets = catalog.sets.len(),
        "loaded catalog"
    );
    validate(&catalog)?;
    let index = index::build_index(&catalog);
    Ok((catalog, index))
}

/// Every id must be usable as a file name and every card's set must resolve.
fn validate(catalog: &Catalog) -> Result<(), BuildError> {
    generate::check_file_names(catalog)?;
    catalog.card_sets()?;
    Ok(())
}

/// Run the full build from the source `root` into `output_dir`.
pub fn build(root: &Path, config: &SiteConfig, output_dir: &Path) -> Result<BuildReport, BuildError> {
    let catalog = load::load_catalog(&config.cards_dir(root), &config.sets_dir(root))?;
    tracing::info!(
        cards = catalog.cards.len(),
        sets = catalog.sets.len(),
        "loaded catalog"
    );
    validate(&catalog)?;
    let index = index::build_index(&catalog);

    fs::create_dir_all(output_dir).map_err(|source| BuildError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let staged = stage::stage_assets(root, output_dir, &config.assets)?;
    let manifests = manifest::write_manifests(&index, &config.manifests, output_dir)?;

    let env = generate::template_env(&config.templates_dir(root), &config.base_url);
    let pages = generate::generate(&env, &catalog, &index, &config.templates, output_dir)?;
    tracing::info!(pages = pages.len(), output = %output_dir.display(), "generated site");

    Ok(BuildReport {
        catalog,
        index,
        staged,
        manifests,
        pages,
        output_dir: output_dir.to_path_buf(),
    })
}
