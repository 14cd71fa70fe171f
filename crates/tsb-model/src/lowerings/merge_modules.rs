//! Namespace merging across the files of one source set.
//!
//! Submodules sharing a fully-qualified name become one module hosted at
//! the first occurrence: declarations concatenated in encounter order,
//! children merged by the same rule. File roots are never merged with
//! each other.

use super::push_unique;
use crate::model::{AnnotationModel, ImportModel, ModuleModel, SourceFileModel, SourceSetModel, TopLevelModel};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;
use tsb_common::{DiagnosticBag, NameEntity};

#[derive(Debug)]
struct MergedModule {
    name: NameEntity,
    short_name: String,
    declarations: Vec<TopLevelModel>,
    annotations: Vec<AnnotationModel>,
    imports: Vec<ImportModel>,
    children: IndexSet<NameEntity>,
    occurrences: usize,
}

#[derive(Debug, Default)]
struct ModuleIndex {
    modules: IndexMap<NameEntity, MergedModule>,
}

impl ModuleIndex {
    /// Record `module` and its descendants; returns the child names of
    /// `module` in order.
    fn collect_children(&mut self, submodules: Vec<ModuleModel>) -> IndexSet<NameEntity> {
        let mut names = IndexSet::new();
        for submodule in submodules {
            names.insert(submodule.name.clone());
            self.collect(submodule);
        }
        names
    }

    fn collect(&mut self, module: ModuleModel) {
        let children = self.collect_children(module.submodules);
        match self.modules.get_mut(&module.name) {
            Some(merged) => {
                merged.declarations.extend(module.declarations);
                push_unique(&mut merged.annotations, module.annotations);
                push_unique(&mut merged.imports, module.imports);
                merged.children.extend(children);
                merged.occurrences += 1;
            }
            None => {
                self.modules.insert(
                    module.name.clone(),
                    MergedModule {
                        name: module.name,
                        short_name: module.short_name,
                        declarations: module.declarations,
                        annotations: module.annotations,
                        imports: module.imports,
                        children,
                        occurrences: 1,
                    },
                );
            }
        }
    }

    /// The merged module `name`, or `None` when it was already emitted.
    fn emit(&mut self, name: &NameEntity) -> Option<ModuleModel> {
        let merged = self.modules.shift_remove(name)?;
        if merged.occurrences > 1 {
            debug!(module = %merged.name, occurrences = merged.occurrences, "merged module");
        }
        let submodules = self.emit_all(&merged.children);
        Some(ModuleModel {
            name: merged.name,
            short_name: merged.short_name,
            declarations: merged.declarations,
            annotations: merged.annotations,
            submodules,
            imports: merged.imports,
        })
    }

    fn emit_all(&mut self, names: &IndexSet<NameEntity>) -> Vec<ModuleModel> {
        names.iter().filter_map(|name| self.emit(name)).collect()
    }
}

/// Merge same-named submodules across every file of the set.
pub fn merge_modules(source_set: SourceSetModel, _diagnostics: &mut DiagnosticBag) -> SourceSetModel {
    let mut index = ModuleIndex::default();
    let files: Vec<(SourceFileModel, IndexSet<NameEntity>)> = source_set
        .sources
        .into_iter()
        .map(|mut file| {
            let children = index.collect_children(std::mem::take(&mut file.root.submodules));
            (file, children)
        })
        .collect();
    let sources = files
        .into_iter()
        .map(|(mut file, children)| {
            file.root.submodules = index.emit_all(&children);
            file
        })
        .collect();
    SourceSetModel {
        source_name: source_set.source_name,
        sources,
    }
}
