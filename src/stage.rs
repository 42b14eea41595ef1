//! Static asset staging.
//!
//! Copies the client-side script and the raw data directory into the output
//! root unchanged. Existing files at the destination are overwritten, so
//! staging twice from the same inputs leaves the same tree.

use crate::config::AssetsConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("cannot copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Counts of what staging copied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSummary {
    pub files: usize,
    pub dirs: usize,
}

/// Copy the configured files and directories from `root` into `output_dir`.
pub fn stage_assets(
    root: &Path,
    output_dir: &Path,
    assets: &AssetsConfig,
) -> Result<StageSummary, StageError> {
    let mut summary = StageSummary::default();

    for file in &assets.files {
        copy_file(&root.join(file), &output_dir.join(file))?;
        summary.files += 1;
    }
    for dir in &assets.dirs {
        summary.files += copy_tree(&root.join(dir), &output_dir.join(dir))?;
        summary.dirs += 1;
    }

    tracing::info!(files = summary.files, dirs = summary.dirs, "staged assets");
    Ok(summary)
}

/// Recursively copy `src` into `dst`, returning the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, StageError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| StageError::Copy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source,
            })?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn copy_file(from: &Path, to: &Path) -> Result<(), StageError> {
    let copy_err = |source| StageError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(copy_err)?;
    }
    fs::copy(from, to).map_err(copy_err)?;
    Ok(())
}
