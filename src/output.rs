//! CLI output formatting.
//!
//! Output is an inventory of the catalog, not a file listing: each set is
//! shown with the cards printed in it, reprints are called out by name, and
//! generated files are listed against the record they came from.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Sets
//! 001 Core Set (3 cards)
//!     Source: data/sets/core.json
//! 002 Wyrms of the Deep (2 cards)
//!     Source: data/sets/wyrms.json
//!
//! Reprints
//!     Dragon Whelp: a1, a2
//!
//! Loaded 5 cards in 2 sets
//! ```
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 index → index.html
//! 002 search → search.html
//!
//! Cards
//! 001 Dragon Whelp → a1.html
//!
//! Sets
//! 001 Core Set → core.html
//!
//! Staged 8 files, wrote data/cards.json and data/sets.json
//! Generated 4 pages, 5 card pages, 2 set pages
//! ```
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::generate::PageKind;
use crate::index::SiteIndex;
use crate::load::Catalog;
use crate::pipeline::BuildReport;
use crate::types::Set;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// A set's display title: its `name` field, or its id when it has none.
fn set_title(set: &Set) -> &str {
    set.fields
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(&set.id)
}

/// Show `path` relative to `root` when possible.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Catalog inventory: sets with card counts, reprints, totals.
pub fn format_catalog_output(catalog: &Catalog, index: &SiteIndex, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Sets".to_string());
    for (pos, set) in catalog.sets.values().enumerate() {
        let count = catalog
            .cards
            .values()
            .filter(|c| c.set.as_deref() == Some(set.id.as_str()))
            .count();
        lines.push(format!(
            "{} {} ({} cards)",
            format_index(pos + 1),
            set_title(set),
            count
        ));
        if let Some(source) = catalog.sets.source(&set.id) {
            lines.push(format!("{}Source: {}", indent(1), display_path(source, root)));
        }
    }

    let reprints: Vec<_> = index.reprints().collect();
    if !reprints.is_empty() {
        lines.push(String::new());
        lines.push("Reprints".to_string());
        for (name, ids) in reprints {
            lines.push(format!("{}{}: {}", indent(1), name, ids.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Loaded {} cards in {} sets",
        catalog.cards.len(),
        catalog.sets.len()
    ));
    lines
}

pub fn print_catalog_output(catalog: &Catalog, index: &SiteIndex, root: &Path) {
    for line in format_catalog_output(catalog, index, root) {
        println!("{}", line);
    }
}

/// Generated files grouped by page kind, then staging and page totals.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    let sections = [
        (PageKind::Top, "Pages"),
        (PageKind::Card, "Cards"),
        (PageKind::Set, "Sets"),
    ];
    for (kind, heading) in sections {
        let pages: Vec<_> = report.pages.iter().filter(|p| p.kind == kind).collect();
        if pages.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(heading.to_string());
        for (pos, page) in pages.iter().enumerate() {
            let title = match kind {
                PageKind::Top => page.id.as_str(),
                PageKind::Card => report
                    .catalog
                    .cards
                    .get(&page.id)
                    .map_or(page.id.as_str(), |c| c.name.as_str()),
                PageKind::Set => report
                    .catalog
                    .sets
                    .get(&page.id)
                    .map_or(page.id.as_str(), set_title),
            };
            lines.push(format!("{} {} → {}", format_index(pos + 1), title, page.file));
        }
    }

    let count = |kind: PageKind| report.pages.iter().filter(|p| p.kind == kind).count();
    lines.push(String::new());
    lines.push(format!(
        "Staged {} files, wrote {} and {}",
        report.staged.files,
        display_path(&report.manifests.cards, &report.output_dir),
        display_path(&report.manifests.sets, &report.output_dir),
    ));
    lines.push(format!(
        "Generated {} pages, {} card pages, {} set pages",
        count(PageKind::Top),
        count(PageKind::Card),
        count(PageKind::Set)
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}
