//! The translator driver.
//!
//! Composes every stage in its fixed order:
//!
//! ```text
//! SourceSetDeclaration --declaration stages--> introduce_nodes
//!   --node stages--> introduce_models --model stages--> SourceSetModel
//! ```
//!
//! The library Node Model is built once (or rehydrated from a cache) and
//! shared read-only by every source set; source sets of a bundle are
//! lowered in parallel.

use crate::convert::introduce_models;
use crate::pipeline::{Lowering, Pipeline};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, debug_span, info};
use tsb_common::{Diagnostic, DiagnosticBag, UidGenerator};
use tsb_declarations::lowerings as declaration_lowerings;
use tsb_declarations::{SourceBundleDeclaration, SourceFileDeclaration, SourceSetDeclaration};
use tsb_model::lowerings as model_lowerings;
use tsb_model::{SourceBundleModel, SourceSetModel};
use tsb_nodes::lowerings as node_lowerings;
use tsb_nodes::{SourceSetNode, introduce_nodes};

const INTRODUCE_NODES: &str = "introduce_nodes";
const INTRODUCE_MODELS: &str = "introduce_models";

/// `introduce_qualified_names` bound to the shared library.
struct QualifiedNames {
    library: Option<Arc<SourceSetNode>>,
}

impl Lowering<SourceSetNode> for QualifiedNames {
    fn name(&self) -> &'static str {
        "introduce_qualified_names"
    }

    fn lower(&self, input: SourceSetNode, diagnostics: &mut DiagnosticBag) -> SourceSetNode {
        node_lowerings::introduce_qualified_names(input, self.library.as_deref(), diagnostics)
    }
}

pub fn declaration_pipeline() -> Pipeline<SourceSetDeclaration> {
    Pipeline::new()
        .function("filter_out_non_declarations", declaration_lowerings::filter_out_non_declarations)
        .function("substitute_stdlib_entities", declaration_lowerings::substitute_stdlib_entities)
        .function("resolve_utility_types", declaration_lowerings::resolve_utility_types)
        .function("resolve_default_type_params", declaration_lowerings::resolve_default_type_params)
        .function("generate_interface_references", declaration_lowerings::generate_interface_references)
        .function("desugar_array_declarations", declaration_lowerings::desugar_array_declarations)
}

pub fn node_pipeline(library: Option<Arc<SourceSetNode>>) -> Pipeline<SourceSetNode> {
    Pipeline::new()
        .function("introduce_type_nodes", node_lowerings::introduce_type_nodes)
        .stage(QualifiedNames { library })
        .function("lower_nullable", node_lowerings::lower_nullable)
        .function("lower_primitives", node_lowerings::lower_primitives)
        .function("lower_varargs", node_lowerings::lower_varargs)
        .function("lower_intersection_type", node_lowerings::lower_intersection_type)
        .function("lower_this_type", node_lowerings::lower_this_type)
        .function("resolve_type_aliases", node_lowerings::resolve_type_aliases)
        .function("specify_union_type", node_lowerings::specify_union_type)
        .function("remove_unused_generated_entities", node_lowerings::remove_unused_generated_entities)
        .function("synthesize_overloads", node_lowerings::synthesize_overloads)
        .function("rearrange_constructors", node_lowerings::rearrange_constructors)
        .function("lower_interface_operators", node_lowerings::lower_interface_operators)
        .function("move_type_aliases_outside", node_lowerings::move_type_aliases_outside)
}

pub fn model_pipeline() -> Pipeline<SourceSetModel> {
    Pipeline::new()
        .function("escape_identifiers", model_lowerings::escape_identifiers)
        .function("merge_modules", model_lowerings::merge_modules)
        .function("merge_classes_and_interfaces", model_lowerings::merge_classes_and_interfaces)
        .function("merge_vars_and_interfaces", model_lowerings::merge_vars_and_interfaces)
        .function("merge_nested_classes", model_lowerings::merge_nested_classes)
        .function("lower_overrides", model_lowerings::lower_overrides)
        .function("add_explicit_getters_and_setters", model_lowerings::add_explicit_getters_and_setters)
}

/// Output of a bundle translation.
#[derive(Debug)]
pub struct Translation {
    pub model: SourceBundleModel,
    pub diagnostics: Vec<Diagnostic>,
    /// Library the bundle was resolved against.
    pub library: Option<Arc<SourceSetNode>>,
}

pub struct Translator {
    library: Option<Arc<SourceSetNode>>,
    declarations: Pipeline<SourceSetDeclaration>,
    nodes: Pipeline<SourceSetNode>,
    models: Pipeline<SourceSetModel>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Translator {
    pub fn new(library: Option<Arc<SourceSetNode>>) -> Self {
        Self {
            declarations: declaration_pipeline(),
            nodes: node_pipeline(library.clone()),
            models: model_pipeline(),
            library,
        }
    }

    pub fn library(&self) -> Option<&SourceSetNode> {
        self.library.as_deref()
    }

    /// Every stage, transitions included, in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        let mut names = self.declarations.stage_names();
        names.push(INTRODUCE_NODES);
        names.extend(self.nodes.stage_names());
        names.push(INTRODUCE_MODELS);
        names.extend(self.models.stage_names());
        names
    }

    /// Library Node Model for `source_set`. Library nodes are only
    /// consulted for names, so node stages do not run on them.
    pub fn prepare_library(source_set: SourceSetDeclaration, diagnostics: &mut DiagnosticBag) -> SourceSetNode {
        let _span = debug_span!("prepare_library", sources = ?source_set.source_name).entered();
        let declarations = declaration_pipeline().run(source_set, diagnostics);
        let mut uids = UidGenerator::library();
        diagnostics.enter_stage(INTRODUCE_NODES);
        let library = introduce_nodes(declarations, &mut uids, diagnostics);
        diagnostics.leave_stage();
        debug!(uids = uids.issued(), "library prepared");
        library
    }

    /// Serialized library Node Model.
    pub fn library_to_json(library: &SourceSetNode, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(library)
        } else {
            serde_json::to_string(library)
        }
    }

    /// Rehydrate a library Node Model written by `library_to_json`.
    pub fn library_from_json(text: &str) -> serde_json::Result<SourceSetNode> {
        serde_json::from_str(text)
    }

    /// Lower one source set through every stage.
    pub fn lower_source_set(
        &self,
        source_set: SourceSetDeclaration,
        uids: &mut UidGenerator,
        diagnostics: &mut DiagnosticBag,
    ) -> SourceSetModel {
        let _span = debug_span!("lower_source_set", sources = ?source_set.source_name).entered();
        let declarations = self.declarations.run(source_set, diagnostics);

        let nodes = {
            let _span = debug_span!("lowering", stage = INTRODUCE_NODES).entered();
            diagnostics.enter_stage(INTRODUCE_NODES);
            let nodes = introduce_nodes(declarations, uids, diagnostics);
            diagnostics.leave_stage();
            nodes
        };
        let nodes = self.nodes.run(nodes, diagnostics);

        let models = {
            let _span = debug_span!("lowering", stage = INTRODUCE_MODELS).entered();
            diagnostics.enter_stage(INTRODUCE_MODELS);
            let models = introduce_models(nodes, self.library(), diagnostics);
            diagnostics.leave_stage();
            models
        };
        self.models.run(models, diagnostics)
    }

    /// Lower every source set of `bundle`. Library-origin sets are not
    /// emitted; when no library was supplied they become the library.
    pub fn lower_bundle(&self, bundle: SourceBundleDeclaration) -> Translation {
        let (libraries, sources): (Vec<_>, Vec<_>) =
            bundle.sources.into_iter().partition(SourceSetDeclaration::is_library);
        let mut diagnostics = DiagnosticBag::new();
        if self.library.is_none() && !libraries.is_empty() {
            let files: Vec<SourceFileDeclaration> = libraries.into_iter().flat_map(|set| set.sources).collect();
            let library = Self::prepare_library(SourceSetDeclaration::new("<library>", files), &mut diagnostics);
            let translator = Self::new(Some(Arc::new(library)));
            let mut translation = translator.lower_sources(sources);
            for diagnostic in translation.diagnostics {
                diagnostics.push(diagnostic);
            }
            translation.diagnostics = diagnostics.into_vec();
            return translation;
        }
        if !libraries.is_empty() {
            debug!(sets = libraries.len(), "library supplied, skipping bundled library sets");
        }
        self.lower_sources(sources)
    }

    fn lower_sources(&self, sources: Vec<SourceSetDeclaration>) -> Translation {
        info!(sets = sources.len(), "lowering bundle");
        let lowered: Vec<(SourceSetModel, DiagnosticBag)> = sources
            .into_par_iter()
            .enumerate()
            .map(|(index, source_set)| {
                let mut uids = UidGenerator::new(format!("set{}", index + 1));
                let mut diagnostics = DiagnosticBag::new();
                let model = self.lower_source_set(source_set, &mut uids, &mut diagnostics);
                (model, diagnostics)
            })
            .collect();
        let mut diagnostics = Vec::new();
        let mut models = Vec::with_capacity(lowered.len());
        for (model, bag) in lowered {
            diagnostics.extend(bag.into_vec());
            models.push(model);
        }
        Translation {
            model: SourceBundleModel { sources: models },
            diagnostics,
            library: self.library.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/translator_tests.rs"]
mod tests;
