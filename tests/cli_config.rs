//! Config loading and the file-level driver.

use std::fs;
use tempfile::TempDir;
use tsbind::config::{ResolvedOptions, TsbindConfig, find_config, load_config, parse_config};
use tsbind::declarations::{
    InterfaceDeclaration, MemberDeclaration, ModuleDeclaration, PropertyDeclaration, SourceBundleDeclaration,
    SourceFileDeclaration, SourceSetDeclaration, TopLevelDeclaration, TypeDeclaration,
};
use tsbind::driver;
use tsbind::model::SourceBundleModel;

fn bundle() -> SourceBundleDeclaration {
    let library = SourceSetDeclaration::new(
        "lib",
        vec![SourceFileDeclaration::new(
            "lib.d.ts",
            ModuleDeclaration::library(vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new(
                "Node",
                Vec::new(),
            ))]),
        )],
    );
    let app = SourceSetDeclaration::new(
        "app",
        vec![SourceFileDeclaration::new(
            "tree.d.ts",
            ModuleDeclaration::root(vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new(
                "Tree",
                vec![MemberDeclaration::Property(
                    PropertyDeclaration::new("root", TypeDeclaration::reference("Node")).optional(),
                )],
            ))]),
        )],
    );
    SourceBundleDeclaration {
        sources: vec![library, app],
    }
}

#[test]
fn test_lenient_booleans() {
    let config = parse_config(r#"{ "pretty": "yes", "strict": "0" }"#).unwrap();
    assert_eq!(config.pretty, Some(true));
    assert_eq!(config.strict, Some(false));
    assert!(parse_config(r#"{ "strict": "maybe" }"#).is_err());
}

#[test]
fn test_unknown_keys_are_rejected() {
    let error = parse_config(r#"{ "librarycache": "x.json" }"#).unwrap_err();
    assert!(format!("{error:#}").contains("librarycache"));
}

#[test]
fn test_load_rebases_relative_paths() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tsbind.json");
    fs::write(&path, r#"{ "libraryCache": "cache/lib.json", "emitLibraryCache": "/abs/lib.json" }"#).unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.library_cache, Some(dir.path().join("cache/lib.json")));
    assert_eq!(config.emit_library_cache.as_deref(), Some(std::path::Path::new("/abs/lib.json")));
    assert_eq!(find_config(dir.path()), Some(path));
}

#[test]
fn test_missing_config_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let error = load_config(&path).unwrap_err();
    assert!(error.to_string().contains("absent.json"));
    assert_eq!(find_config(dir.path()), None);
}

#[test]
fn test_flags_override_file_values() {
    let file = TsbindConfig {
        pretty: Some(true),
        strict: Some(false),
        ..TsbindConfig::default()
    };
    let flags = TsbindConfig {
        strict: Some(true),
        ..TsbindConfig::default()
    };
    assert_eq!(
        file.merge(flags).resolve(),
        ResolvedOptions {
            library_cache: None,
            emit_library_cache: None,
            pretty: true,
            strict: true,
        }
    );
    assert_eq!(TsbindConfig::default().resolve(), ResolvedOptions::default());
}

#[test]
fn test_emitted_library_cache_is_reused() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bundle.json");
    fs::write(&input, serde_json::to_string(&bundle()).unwrap()).unwrap();
    let cache = dir.path().join("lib-nodes.json");

    let emitting = ResolvedOptions {
        emit_library_cache: Some(cache.clone()),
        ..ResolvedOptions::default()
    };
    let first = driver::translate(driver::read_bundle(&input).unwrap(), &emitting).unwrap();
    assert!(cache.is_file());

    let reusing = ResolvedOptions {
        library_cache: Some(cache),
        ..ResolvedOptions::default()
    };
    let app_only = SourceBundleDeclaration {
        sources: bundle().sources.into_iter().skip(1).collect(),
    };
    let second = driver::translate(app_only, &reusing).unwrap();
    assert_eq!(first.model, second.model);
    assert!(second.diagnostics.is_empty());
}

#[test]
fn test_written_model_reads_back() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("model.json");
    let translation = driver::translate(bundle(), &ResolvedOptions::default()).unwrap();
    driver::write_model(&translation.model, Some(&output), true).unwrap();
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("\n  "));
    let model: SourceBundleModel = serde_json::from_str(&text).unwrap();
    assert_eq!(model, translation.model);
}

#[test]
fn test_strict_exit_code() {
    let translation = driver::translate(bundle(), &ResolvedOptions::default()).unwrap();
    assert_eq!(driver::exit_code(&translation.diagnostics, true), driver::EXIT_SUCCESS);
    let diagnostic = tsbind::Diagnostic::new(tsbind::DiagnosticKind::UnsupportedConstruct, "construct signature");
    assert_eq!(driver::exit_code(&[diagnostic.clone()], true), driver::EXIT_DIAGNOSTICS);
    assert_eq!(driver::exit_code(&[diagnostic], false), driver::EXIT_SUCCESS);
}
