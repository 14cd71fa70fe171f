//! `tsbind.json` loading.
//!
//! ```json
//! {
//!   "libraryCache": "build/lib-nodes.json",
//!   "emitLibraryCache": "build/lib-nodes.json",
//!   "pretty": true,
//!   "strict": "yes"
//! }
//! ```
//!
//! Paths are relative to the directory holding the config file. Command
//! line flags override file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "tsbind.json";

/// Accepts `true`, `"true"`, `"yes"`, `"1"`, `"on"` and their negations.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TsbindConfig {
    /// Serialized library Node Model to reuse instead of the bundle's
    /// library sets.
    #[serde(default)]
    pub library_cache: Option<PathBuf>,
    /// Where to write the library Node Model after a run.
    #[serde(default)]
    pub emit_library_cache: Option<PathBuf>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub pretty: Option<bool>,
    /// Fail the run when any diagnostic was raised.
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub strict: Option<bool>,
}

/// Options after defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub library_cache: Option<PathBuf>,
    pub emit_library_cache: Option<PathBuf>,
    pub pretty: bool,
    pub strict: bool,
}

impl TsbindConfig {
    /// `overrides` wins wherever it sets a value.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            library_cache: overrides.library_cache.or(self.library_cache),
            emit_library_cache: overrides.emit_library_cache.or(self.emit_library_cache),
            pretty: overrides.pretty.or(self.pretty),
            strict: overrides.strict.or(self.strict),
        }
    }

    fn rebase(mut self, base_dir: &Path) -> Self {
        let rebase = |path: PathBuf| if path.is_relative() { base_dir.join(path) } else { path };
        self.library_cache = self.library_cache.map(rebase);
        self.emit_library_cache = self.emit_library_cache.map(rebase);
        self
    }

    pub fn resolve(self) -> ResolvedOptions {
        ResolvedOptions {
            library_cache: self.library_cache,
            emit_library_cache: self.emit_library_cache,
            pretty: self.pretty.unwrap_or(false),
            strict: self.strict.unwrap_or(false),
        }
    }
}

pub fn parse_config(source: &str) -> Result<TsbindConfig> {
    serde_json::from_str(source).context("failed to parse tsbind config")
}

/// Load `path`, resolving its relative paths against its directory.
pub fn load_config(path: &Path) -> Result<TsbindConfig> {
    let source = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config = parse_config(&source).with_context(|| format!("in {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(config.rebase(base_dir))
}

/// `tsbind.json` in `dir`, when present.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}
