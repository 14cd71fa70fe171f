//! Bundle translation around the [`Translator`].

use crate::config::ResolvedOptions;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tsb_common::Diagnostic;
use tsb_declarations::SourceBundleDeclaration;
use tsb_lowering::{Translation, Translator};
use tsb_model::SourceBundleModel;
use tsb_nodes::SourceSetNode;

pub const EXIT_SUCCESS: i32 = 0;
/// Strict mode and at least one diagnostic.
pub const EXIT_DIAGNOSTICS: i32 = 1;

pub fn read_bundle(path: &Path) -> Result<SourceBundleDeclaration> {
    let source = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("{} is not a declaration bundle", path.display()))
}

pub fn load_library(path: &Path) -> Result<SourceSetNode> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read library cache {}", path.display()))?;
    Translator::library_from_json(&source)
        .with_context(|| format!("{} is not a library node cache", path.display()))
}

/// Translate `bundle`, reusing and refreshing the library cache as
/// `options` ask.
pub fn translate(bundle: SourceBundleDeclaration, options: &ResolvedOptions) -> Result<Translation> {
    let library = match &options.library_cache {
        Some(path) if path.is_file() => {
            info!(path = %path.display(), "reusing library cache");
            Some(Arc::new(load_library(path)?))
        }
        _ => None,
    };
    let translation = Translator::new(library).lower_bundle(bundle);
    if let Some(path) = &options.emit_library_cache
        && let Some(library) = &translation.library
    {
        let json = Translator::library_to_json(library, options.pretty).context("failed to serialize library")?;
        std::fs::write(path, json).with_context(|| format!("failed to write library cache {}", path.display()))?;
        info!(path = %path.display(), "library cache written");
    }
    Ok(translation)
}

pub fn model_to_json(model: &SourceBundleModel, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(model)
    } else {
        serde_json::to_string(model)
    };
    json.context("failed to serialize model")
}

/// Write the model to `output`, or stdout.
pub fn write_model(model: &SourceBundleModel, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = model_to_json(model, pretty)?;
    match output {
        Some(path) => std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write model to stdout")
        }
    }
}

pub fn exit_code(diagnostics: &[Diagnostic], strict: bool) -> i32 {
    if strict && !diagnostics.is_empty() {
        EXIT_DIAGNOSTICS
    } else {
        EXIT_SUCCESS
    }
}
