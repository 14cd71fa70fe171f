//! Target Model conversion and the translator driver.
//!
//! - `convert`: `introduce_models`, the Node Model to Target Model step
//! - `pipeline`: the `Lowering` trait and ordered `Pipeline`
//! - `translator`: composition of every stage, library caching and
//!   parallel bundle lowering

pub mod convert;
pub use convert::{introduce_models, introduce_models_with};

pub mod pipeline;
pub use pipeline::{FnLowering, Lowering, Pipeline};

pub mod translator;
pub use translator::{Translation, Translator};
