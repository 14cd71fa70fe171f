//! Variable + interface merging.
//!
//! The `interface Foo {}` / `declare var Foo: FooConstructor` pattern: a
//! variable typed by an interface `I` next to a class-like `V` of the
//! variable's name. `V` receives a companion object carrying `I`'s members
//! when `I` is declared in the same module, or having `I` as parent
//! otherwise. The variable is removed.

use super::{merge_members, push_unique};
use crate::model::{
    HeritageModel, InterfaceModel, MemberModel, ModuleModel, ObjectModel, SourceSetModel, TopLevelModel, TypeModel,
    TypeValueModel, VariableModel,
};
use crate::visitor::{ModelLowering, walk_module};
use tracing::debug;
use tsb_common::DiagnosticBag;

enum Companion {
    Members(Vec<MemberModel>),
    Parent(HeritageModel),
}

fn local_interface<'a>(module: &'a ModuleModel, ty: &TypeValueModel) -> Option<&'a InterfaceModel> {
    module.declarations.iter().find_map(|declaration| match declaration {
        TopLevelModel::Interface(interface) if interface.name == ty.value => Some(interface),
        _ => None,
    })
}

fn companion_members(members: &[MemberModel]) -> Vec<MemberModel> {
    members
        .iter()
        .cloned()
        .map(|member| match member {
            MemberModel::Method(mut method) => {
                method.static_ = false;
                MemberModel::Method(method)
            }
            MemberModel::Property(mut property) => {
                property.static_ = false;
                MemberModel::Property(property)
            }
            member => member,
        })
        .collect()
}

/// The companion contribution of `variable` when it merges into a
/// class-like of its name in `module`.
fn companion_for(module: &ModuleModel, variable: &VariableModel) -> Option<Companion> {
    let TypeModel::Value(ty) = &variable.type_ else {
        return None;
    };
    if variable.type_.is_dynamic() || variable.name.is_qualified() {
        return None;
    }
    let host = module.declarations.iter().any(|declaration| {
        matches!(declaration, TopLevelModel::Class(_) | TopLevelModel::Interface(_)) && declaration.name() == &variable.name
    });
    if !host {
        return None;
    }
    Some(match local_interface(module, ty) {
        Some(interface) => Companion::Members(companion_members(&interface.members)),
        None => Companion::Parent(HeritageModel {
            value: TypeValueModel {
                params: Vec::new(),
                metadata: None,
                nullable: false,
                ..ty.clone()
            },
            type_params: ty.params.clone(),
        }),
    })
}

fn attach(companion: &mut Option<ObjectModel>, contribution: Companion) {
    let object = companion.get_or_insert_with(|| ObjectModel::companion(Vec::new()));
    match contribution {
        Companion::Members(members) => merge_members(&mut object.members, members),
        Companion::Parent(parent) => push_unique(&mut object.parent_entities, [parent]),
    }
}

struct VarInterfaceMerger;

impl ModelLowering for VarInterfaceMerger {
    fn lower_module(&mut self, module: ModuleModel) -> ModuleModel {
        let mut module = walk_module(self, module);
        let contributions: Vec<_> = module
            .declarations
            .iter()
            .filter_map(|declaration| match declaration {
                TopLevelModel::Variable(variable) => {
                    companion_for(&module, variable).map(|companion| (variable.name.clone(), companion))
                }
                _ => None,
            })
            .collect();
        for (name, contribution) in contributions {
            debug!(module = %module.name, variable = %name, "folding variable into companion");
            module
                .declarations
                .retain(|declaration| !matches!(declaration, TopLevelModel::Variable(variable) if variable.name == name));
            for declaration in &mut module.declarations {
                match declaration {
                    TopLevelModel::Class(class) if class.name == name => {
                        attach(&mut class.companion_object, contribution);
                        break;
                    }
                    TopLevelModel::Interface(interface) if interface.name == name => {
                        attach(&mut interface.companion_object, contribution);
                        break;
                    }
                    _ => {}
                }
            }
        }
        module
    }
}

/// Fold interface-typed variables into the companion of their namesake.
pub fn merge_vars_and_interfaces(source_set: SourceSetModel, _diagnostics: &mut DiagnosticBag) -> SourceSetModel {
    VarInterfaceMerger.lower_source_set(source_set)
}
