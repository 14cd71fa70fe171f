//! Common types shared by every tsbind crate.
//!
//! This crate provides the vocabulary the declaration, node and target
//! models agree on:
//! - Names (`NameEntity`) and the `<ROOT>` / `<LIBROOT>` package sentinels
//! - Declaration identity (`Uid`, `UidGenerator`)
//! - Recoverable diagnostics (`Diagnostic`, `DiagnosticBag`, `DiagnosticKind`)
//! - Well-known standard-library entity tables
//! - Translator limits

// Identifiers and qualifier chains
pub mod names;
pub use names::{LIBRARY_ROOT, NameEntity, ROOT_PACKAGE};

// Declaration identity
pub mod uid;
pub use uid::{Uid, UidGenerator};

// Concerns raised while lowering
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticKind};

// Standard-library entity tables
pub mod stdlib;

// Centralized limits
pub mod limits;
