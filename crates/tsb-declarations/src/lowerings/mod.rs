//! Declaration-level lowerings.
//!
//! Each lowering is a total function `SourceSetDeclaration ->
//! SourceSetDeclaration`. They run before node introduction, in this order:
//!
//! | # | Lowering | Effect |
//! |---|----------|--------|
//! | 1 | `filter_out_non_declarations` | drops statements |
//! | 2 | `substitute_stdlib_entities` | source std-lib names to target names |
//! | 3 | `resolve_utility_types` | `Partial`, `Pick`, `Omit`, `Record`, `Readonly`, `Required`, `NonNullable` |
//! | 4 | `resolve_default_type_params` | fills omitted type arguments |
//! | 5 | `generate_interface_references` | hoists object literal types into interfaces |
//! | 6 | `desugar_array_declarations` | `T[]` to `Array<T>` |

mod arrays;
mod default_type_params;
mod filter;
mod interface_references;
mod stdlib_entities;
mod utility_types;

pub use arrays::desugar_array_declarations;
pub use default_type_params::resolve_default_type_params;
pub use filter::filter_out_non_declarations;
pub use interface_references::generate_interface_references;
pub use stdlib_entities::substitute_stdlib_entities;
pub use utility_types::resolve_utility_types;

use crate::model::{InterfaceDeclaration, ModuleDeclaration, TopLevelDeclaration};
use crate::visitor::DeclarationScope;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tsb_common::NameEntity;

/// Interfaces synthesized while lowering, grouped by the module that will
/// host them. Hosting modules receive them after their own declarations.
#[derive(Debug, Default)]
struct PendingInterfaces {
    by_module: IndexMap<NameEntity, Vec<InterfaceDeclaration>>,
    issued: FxHashSet<(NameEntity, NameEntity)>,
}

impl PendingInterfaces {
    /// Queue `interface` for `module`. Returns false when an interface of
    /// the same name was already issued there.
    fn push(&mut self, module: &NameEntity, interface: InterfaceDeclaration) -> bool {
        if !self.issued.insert((module.clone(), interface.name.clone())) {
            return false;
        }
        self.by_module.entry(module.clone()).or_default().push(interface);
        true
    }

    fn take(&mut self, module: &NameEntity) -> Option<Vec<InterfaceDeclaration>> {
        self.by_module.shift_remove(module).filter(|interfaces| !interfaces.is_empty())
    }

    /// Append the interfaces queued for `module_name` to `module`.
    fn flush_into(&mut self, module_name: &NameEntity, mut module: ModuleDeclaration) -> ModuleDeclaration {
        if let Some(interfaces) = self.take(module_name) {
            module
                .declarations
                .extend(interfaces.into_iter().map(TopLevelDeclaration::Interface));
        }
        module
    }
}

/// Interfaces of a source set keyed by fully-qualified name. Same-named
/// declarations are merged, members in declaration order.
#[derive(Debug, Default)]
struct InterfaceIndex {
    interfaces: FxHashMap<NameEntity, InterfaceDeclaration>,
}

impl InterfaceIndex {
    fn collect(source_set: &crate::model::SourceSetDeclaration) -> Self {
        let mut index = Self::default();
        for file in &source_set.sources {
            index.collect_module(&file.root, &file.root.name);
        }
        index
    }

    fn collect_module(&mut self, module: &ModuleDeclaration, module_name: &NameEntity) {
        for declaration in &module.declarations {
            match declaration {
                TopLevelDeclaration::Interface(interface) => {
                    let fq_name = NameEntity::qualify(module_name, &interface.name);
                    match self.interfaces.get_mut(&fq_name) {
                        Some(existing) => existing.members.extend(interface.members.iter().cloned()),
                        None => {
                            self.interfaces.insert(fq_name, interface.clone());
                        }
                    }
                }
                TopLevelDeclaration::Module(nested) => {
                    self.collect_module(nested, &NameEntity::qualify(module_name, &nested.name));
                }
                _ => {}
            }
        }
    }

    /// Innermost enclosing module first, then outwards.
    fn lookup(&self, scope: &DeclarationScope, name: &NameEntity) -> Option<&InterfaceDeclaration> {
        let mut package = Some(scope.module.clone());
        while let Some(current) = package {
            if let Some(interface) = self.interfaces.get(&NameEntity::qualify(&current, name)) {
                return Some(interface);
            }
            package = current.parent();
        }
        self.interfaces.get(name)
    }
}

#[cfg(test)]
#[path = "../../tests/lowerings_tests.rs"]
mod tests;
