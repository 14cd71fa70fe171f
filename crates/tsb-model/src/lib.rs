//! Target Model for tsbind.
//!
//! The Target Model is the printer boundary: a tree of modules whose
//! declarations carry fully resolved types. This crate provides:
//! - The model types (`model`) and their textual forms (`render`)
//! - A consuming rewriter (`visitor`)
//! - The model-level lowerings: identifier escaping and the merges

pub mod model;
pub use model::*;

mod render;

pub mod visitor;
pub use visitor::ModelLowering;

pub mod lowerings;
