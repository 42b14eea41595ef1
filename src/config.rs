//! Site configuration module.
//!
//! Handles loading, validating, and merging `wyverndb.toml`. The file is
//! optional and lives in the source root; without it the build uses the stock
//! layout the site has always had:
//!
//! ```text
//! ./
//! ├── wyverndb.toml        # Optional overrides
//! ├── wyverndb.js          # Client-side search script (copied verbatim)
//! ├── index.jinja          # Top-level page templates
//! ├── search.jinja
//! ├── random.jinja
//! ├── syntax.jinja
//! ├── card.jinja           # One page per card
//! ├── set.jinja            # One page per set
//! ├── data/
//! │   ├── cards/*.json     # One document per card
//! │   └── sets/*.json      # One document per set
//! └── docs/                # Output
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_url = "https://iconmaster.info/wyverndb/"
//! output_dir = "docs"
//!
//! [data]
//! dir = "data"              # Record root, relative to the source root
//! cards = "cards"           # Card documents, relative to data.dir
//! sets = "sets"             # Set documents, relative to data.dir
//!
//! [templates]
//! dir = "."
//! pages = ["index", "search", "random", "syntax"]
//! card = "card.jinja"
//! set = "set.jinja"
//!
//! [assets]
//! files = ["wyverndb.js"]   # Copied into the output root
//! dirs = ["data"]           # Copied recursively into the output root
//!
//! [manifests]
//! dir = "data"              # Relative to the output root
//! cards = "cards.json"
//! sets = "sets.json"
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional config file in the source root.
pub const CONFIG_FILE: &str = "wyverndb.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `wyverndb.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute URL the site is published under, exposed to templates as `BASE_URL`.
    pub base_url: String,
    /// Output root, relative to the source root.
    pub output_dir: String,
    pub data: DataConfig,
    pub templates: TemplatesConfig,
    pub assets: AssetsConfig,
    pub manifests: ManifestsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://iconmaster.info/wyverndb/".to_string(),
            output_dir: "docs".to_string(),
            data: DataConfig::default(),
            templates: TemplatesConfig::default(),
            assets: AssetsConfig::default(),
            manifests: ManifestsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("base_url must not be empty".into()));
        }
        if self.templates.card.is_empty() || self.templates.set.is_empty() {
            return Err(ConfigError::Validation(
                "templates.card and templates.set must not be empty".into(),
            ));
        }
        if self.templates.pages.is_empty() {
            return Err(ConfigError::Validation(
                "templates.pages must list at least one page".into(),
            ));
        }
        for page in &self.templates.pages {
            if !is_plain_file_name(page) {
                return Err(ConfigError::Validation(format!(
                    "templates.pages entry `{page}` must be a plain file name"
                )));
            }
        }
        for name in [&self.manifests.cards, &self.manifests.sets] {
            if !is_plain_file_name(name) {
                return Err(ConfigError::Validation(format!(
                    "manifest file name `{name}` must be a plain file name"
                )));
            }
        }
        Ok(())
    }

    /// Directory holding one document per card.
    pub fn cards_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.data.dir).join(&self.data.cards)
    }

    /// Directory holding one document per set.
    pub fn sets_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.data.dir).join(&self.data.sets)
    }

    pub fn templates_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.templates.dir)
    }

    /// Default output root, used when the CLI doesn't override it.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }
}

/// Where the card and set documents live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub dir: String,
    pub cards: String,
    pub sets: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            cards: "cards".to_string(),
            sets: "sets".to_string(),
        }
    }
}

/// Template names. Top-level pages render `<page>.jinja` to `<page>.html`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    pub dir: String,
    pub pages: Vec<String>,
    pub card: String,
    pub set: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            pages: ["index", "search", "random", "syntax"]
                .map(String::from)
                .to_vec(),
            card: "card.jinja".to_string(),
            set: "set.jinja".to_string(),
        }
    }
}

impl TemplatesConfig {
    pub fn page_template(page: &str) -> String {
        format!("{page}.jinja")
    }
}

/// Static files copied into the output root as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            files: vec!["wyverndb.js".to_string()],
            dirs: vec!["data".to_string()],
        }
    }
}

/// Id lists published for client-side search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestsConfig {
    /// Directory under the output root.
    pub dir: String,
    pub cards: String,
    pub sets: String,
}

impl Default for ManifestsConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            cards: "cards.json".to_string(),
            sets: "sets.json".to_string(),
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so a user's
///   `pages` list replaces the stock list rather than extending it.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `wyverndb.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from the source root: stock defaults, user overrides on top,
/// unknown keys rejected, result validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `wyverndb.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# WyvernDB Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
# Paths are relative to the directory holding this file.

# Absolute URL the site is published under. Templates see it as BASE_URL.
base_url = "https://iconmaster.info/wyverndb/"

# Where the generated site is written.
output_dir = "docs"

# ---------------------------------------------------------------------------
# Records: one JSON document per card / per set
# ---------------------------------------------------------------------------
[data]
dir = "data"
cards = "cards"   # relative to data.dir
sets = "sets"     # relative to data.dir

# ---------------------------------------------------------------------------
# Templates (Jinja syntax)
# ---------------------------------------------------------------------------
[templates]
dir = "."
# Each entry renders <page>.jinja to <page>.html.
pages = ["index", "search", "random", "syntax"]
# Rendered once per card (<card-id>.html) and once per set (<set-id>.html).
card = "card.jinja"
set = "set.jinja"

# ---------------------------------------------------------------------------
# Static assets copied verbatim into the output root
# ---------------------------------------------------------------------------
[assets]
files = ["wyverndb.js"]
dirs = ["data"]

# ---------------------------------------------------------------------------
# Id manifests for client-side search
# ---------------------------------------------------------------------------
[manifests]
dir = "data"      # relative to the output root
cards = "cards.json"
sets = "sets.json"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_site_layout() {
        let config = SiteConfig::default();
        assert_eq!(config.base_url, "https://iconmaster.info/wyverndb/");
        assert_eq!(config.output_dir, "docs");
        assert_eq!(
            config.templates.pages,
            vec!["index", "search", "random", "syntax"]
        );
        assert_eq!(config.assets.files, vec!["wyverndb.js"]);
        assert_eq!(config.manifests.cards, "cards.json");
    }

    #[test]
    fn record_dirs_resolve_under_root() {
        let config = SiteConfig::default();
        let root = Path::new("/site");
        assert_eq!(config.cards_dir(root), Path::new("/site/data/cards"));
        assert_eq!(config.sets_dir(root), Path::new("/site/data/sets"));
        assert_eq!(config.output_dir(root), Path::new("/site/docs"));
    }

    #[test]
    fn page_template_name() {
        assert_eq!(TemplatesConfig::page_template("syntax"), "syntax.jinja");
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
[templates]
pages = ["index"]
"#,
        )
        .unwrap();
        assert_eq!(config.templates.pages, vec!["index"]);
        assert_eq!(config.templates.card, "card.jinja");
        assert_eq!(config.base_url, "https://iconmaster.info/wyverndb/");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
base_url = "http://localhost:8000/"

[data]
dir = "records"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000/");
        assert_eq!(config.data.dir, "records");
        // Siblings keep their defaults
        assert_eq!(config.data.cards, "cards");
        assert_eq!(config.output_dir, "docs");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
[templates]
card_template = "card.jinja"
"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "baseurl = \"x\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_base_url() {
        let mut config = SiteConfig::default();
        config.base_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_page_with_path_separator() {
        let mut config = SiteConfig::default();
        config.templates.pages.push("../escape".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("../escape"));
    }

    #[test]
    fn validate_manifest_name() {
        let mut config = SiteConfig::default();
        config.manifests.sets = "nested/sets.json".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[templates]
card = ""
"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_rejects_empty_page_list() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[templates]\npages = []\n").unwrap();
        let err = load_config(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("templates.pages"));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str(r#"pages = ["index", "search"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"pages = ["index"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("pages").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r#"
[data]
dir = "data"
cards = "cards"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[data]
cards = "all-cards"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let data = merged.get("data").unwrap();
        assert_eq!(data.get("dir").unwrap().as_str(), Some("data"));
        assert_eq!(data.get("cards").unwrap().as_str(), Some("all-cards"));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        for section in ["data", "templates", "assets", "manifests"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }
}
