//! tsbind: TypeScript declarations to Kotlin/JS external bindings.
//!
//! The middle-end lives in the workspace crates; this crate adds the outer
//! surface around them:
//!
//! - [`config`]: `tsbind.json` loading and option resolution
//! - [`driver`]: bundle I/O and library caching around the [`Translator`]
//! - [`reporter`]: diagnostic summaries for the terminal
//! - [`tracing_config`]: opt-in `tracing` subscriber setup

pub use tsb_common as common;
pub use tsb_declarations as declarations;
pub use tsb_lowering as lowering;
pub use tsb_model as model;
pub use tsb_nodes as nodes;

pub use tsb_common::{Diagnostic, DiagnosticKind};
pub use tsb_lowering::{Translation, Translator};

pub mod config;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
