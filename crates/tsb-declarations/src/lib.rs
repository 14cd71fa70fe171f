//! Declaration Model for tsbind.
//!
//! This crate owns the boundary with the front-end:
//! - `model`: the raw declaration tree (`SourceSetDeclaration` and below)
//! - `visitor`: a consuming rewriter used by every declaration-level lowering
//! - `lowerings`: the lowerings that normalize the source vocabulary before
//!   node introduction

pub mod model;
pub use model::*;

pub mod visitor;
pub use visitor::{DeclarationLowering, DeclarationScope};

pub mod lowerings;
