//! HTML site generation.
//!
//! Final stage of the build. Renders every page through the site's Jinja
//! templates and writes it to the output root.
//!
//! ## Generated Pages
//!
//! - **Top-level pages** (`index.html`, `search.html`, `random.html`,
//!   `syntax.html`): one per configured page name, from `<page>.jinja`
//! - **Card pages** (`<card-id>.html`): one per card, from `card.jinja`
//! - **Set pages** (`<set-id>.html`): one per set, from `set.jinja`
//!
//! ## Template Bindings
//!
//! Every render sees the same globals:
//!
//! | Name | Value |
//! |------|-------|
//! | `cards` | card id → card document |
//! | `sets` | set id → set document |
//! | `cards_by_name` | display name → card ids (reprints) |
//! | `BASE_URL` | `base_url` from the config |
//!
//! plus the functions from [`crate::helpers`]. Card pages add `card` and its
//! owning `set`; set pages add `set`. Maps support Python-style methods
//! (`cards.values()`, `sets.items()`) so templates can iterate them the way
//! Jinja2 templates do.
//!
//! ## Ordering and Failure
//!
//! Pages render in catalog order. Every card's set is resolved, and every
//! record id checked as a file name, before the first page is written; a
//! template or helper error mid-render aborts with the pages written so far
//! left in place.

use crate::config::TemplatesConfig;
use crate::helpers;
use crate::index::SiteIndex;
use crate::load::{Catalog, ReferenceError};
use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, context};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to render {template}: {source}")]
    Template {
        template: String,
        #[source]
        source: minijinja::Error,
    },
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error("{kind} id `{id}` cannot be used as a file name")]
    InvalidFileName { kind: &'static str, id: String },
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Top,
    Card,
    Set,
}

/// A page written to the output root.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub kind: PageKind,
    /// Page name, card id, or set id.
    pub id: String,
    /// File name relative to the output root.
    pub file: String,
}

/// Build the template environment: templates load from `templates_dir`,
/// helpers and `BASE_URL` are bound.
pub fn template_env(templates_dir: &Path, base_url: &str) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(minijinja::path_loader(templates_dir.to_path_buf()));
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_unknown_method_callback(minijinja_contrib::pycompat::unknown_method_callback);
    env.add_global("BASE_URL", base_url);
    helpers::register(&mut env);
    env
}

/// Render and write every page.
pub fn generate(
    env: &Environment<'_>,
    catalog: &Catalog,
    index: &SiteIndex,
    templates: &TemplatesConfig,
    output_dir: &Path,
) -> Result<Vec<RenderedPage>, RenderError> {
    check_file_names(catalog)?;
    let card_sets = catalog.card_sets()?;

    let globals = context! {
        cards => Value::from_serialize(catalog.cards.as_map()),
        sets => Value::from_serialize(catalog.sets.as_map()),
        cards_by_name => Value::from_serialize(&index.cards_by_name),
    };
    let mut writer = PageWriter::new(output_dir);

    for page in &templates.pages {
        let template = TemplatesConfig::page_template(page);
        let html = render(env, &template, globals.clone())?;
        writer.write(PageKind::Top, page, &html)?;
    }

    for (card, set) in card_sets {
        let ctx = context! {
            card => Value::from_serialize(card),
            set => Value::from_serialize(set),
            ..globals.clone()
        };
        let html = render(env, &templates.card, ctx)?;
        writer.write(PageKind::Card, &card.id, &html)?;
    }

    for set in catalog.sets.values() {
        let ctx = context! {
            set => Value::from_serialize(set),
            ..globals.clone()
        };
        let html = render(env, &templates.set, ctx)?;
        writer.write(PageKind::Set, &set.id, &html)?;
    }

    Ok(writer.finish())
}

fn render(env: &Environment<'_>, template: &str, ctx: Value) -> Result<String, RenderError> {
    env.get_template(template)
        .and_then(|tmpl| tmpl.render(ctx))
        .map_err(|source| RenderError::Template {
            template: template.to_string(),
            source,
        })
}

/// Reject ids that would write outside the output root.
pub fn check_file_names(catalog: &Catalog) -> Result<(), RenderError> {
    let card_ids = catalog.cards.ids().map(|id| ("card", id));
    let set_ids = catalog.sets.ids().map(|id| ("set", id));
    for (kind, id) in card_ids.chain(set_ids) {
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(RenderError::InvalidFileName {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

struct PageWriter<'a> {
    output_dir: &'a Path,
    written: HashSet<String>,
    pages: Vec<RenderedPage>,
}

impl<'a> PageWriter<'a> {
    fn new(output_dir: &'a Path) -> Self {
        Self {
            output_dir,
            written: HashSet::new(),
            pages: Vec::new(),
        }
    }

    fn write(&mut self, kind: PageKind, id: &str, html: &str) -> Result<(), RenderError> {
        let file = format!("{id}.html");
        let path = self.output_dir.join(&file);
        fs::write(&path, html).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        if !self.written.insert(file.clone()) {
            tracing::warn!(file = %file, "page overwrites an earlier page with the same name");
        }
        tracing::debug!(path = %path.display(), "generated page");
        self.pages.push(RenderedPage {
            kind,
            id: id.to_string(),
            file,
        });
        Ok(())
    }

    fn finish(self) -> Vec<RenderedPage> {
        self.pages
    }
}
