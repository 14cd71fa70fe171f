//! Ordered lowering stages.
//!
//! A `Pipeline<T>` is a list of stages fixed when it is composed. Running
//! it threads one tree through every stage in order; each stage runs in
//! its own `debug_span!` and tags the diagnostics it raises with its name.

use tracing::{debug, debug_span};
use tsb_common::DiagnosticBag;

/// A total rewrite of `T`.
pub trait Lowering<T> {
    fn name(&self) -> &'static str;

    fn lower(&self, input: T, diagnostics: &mut DiagnosticBag) -> T;
}

/// A named plain function as a stage.
pub struct FnLowering<T> {
    name: &'static str,
    lower: fn(T, &mut DiagnosticBag) -> T,
}

impl<T> FnLowering<T> {
    pub const fn new(name: &'static str, lower: fn(T, &mut DiagnosticBag) -> T) -> Self {
        Self { name, lower }
    }
}

impl<T> Lowering<T> for FnLowering<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn lower(&self, input: T, diagnostics: &mut DiagnosticBag) -> T {
        (self.lower)(input, diagnostics)
    }
}

pub struct Pipeline<T> {
    stages: Vec<Box<dyn Lowering<T> + Send + Sync>>,
}

impl<T> Default for Pipeline<T> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<T: 'static> Pipeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(mut self, stage: impl Lowering<T> + Send + Sync + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    #[must_use]
    pub fn function(self, name: &'static str, lower: fn(T, &mut DiagnosticBag) -> T) -> Self {
        self.stage(FnLowering::new(name, lower))
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn run(&self, mut input: T, diagnostics: &mut DiagnosticBag) -> T {
        for stage in &self.stages {
            let name = stage.name();
            let _span = debug_span!("lowering", stage = name).entered();
            let before = diagnostics.len();
            diagnostics.enter_stage(name);
            input = stage.lower(input, diagnostics);
            diagnostics.leave_stage();
            debug!(raised = diagnostics.len() - before, "stage done");
        }
        input
    }
}

#[cfg(test)]
#[path = "../tests/pipeline_tests.rs"]
mod tests;
