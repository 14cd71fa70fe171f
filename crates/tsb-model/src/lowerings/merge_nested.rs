//! Relocation of nested class-likes into their outer declaration.
//!
//! Two shapes are folded:
//! - a dotted declaration `Outer.Inner` next to `Outer` in one module;
//! - a submodule `Outer` next to a class-like `Outer`: its class-likes
//!   become nested members, other declarations stay in the submodule.
//!
//! A submodule left empty is removed.

use crate::model::{MemberModel, ModuleModel, SourceSetModel, TopLevelModel};
use crate::visitor::{ModelLowering, walk_module};
use tracing::{debug, trace};
use tsb_common::{DiagnosticBag, NameEntity};

fn rename(declaration: TopLevelModel, name: NameEntity) -> TopLevelModel {
    match declaration {
        TopLevelModel::Class(mut class) => {
            class.name = name;
            TopLevelModel::Class(class)
        }
        TopLevelModel::Interface(mut interface) => {
            interface.name = name;
            TopLevelModel::Interface(interface)
        }
        TopLevelModel::Enum(mut enumeration) => {
            enumeration.name = name;
            TopLevelModel::Enum(enumeration)
        }
        TopLevelModel::Object(mut object) => {
            object.name = name;
            TopLevelModel::Object(object)
        }
        TopLevelModel::Function(mut function) => {
            function.name = name;
            TopLevelModel::Function(function)
        }
        TopLevelModel::Variable(mut variable) => {
            variable.name = name;
            TopLevelModel::Variable(variable)
        }
        TopLevelModel::TypeAlias(mut alias) => {
            alias.name = name;
            TopLevelModel::TypeAlias(alias)
        }
    }
}

fn host_members<'a>(declarations: &'a mut [TopLevelModel], name: &NameEntity) -> Option<&'a mut Vec<MemberModel>> {
    declarations
        .iter_mut()
        .filter(|declaration| declaration.name() == name)
        .find_map(TopLevelModel::members_mut)
}

/// `Outer.Inner` declarations, deepest first.
fn relocate_dotted(declarations: &mut Vec<TopLevelModel>) {
    let mut dotted: Vec<NameEntity> = declarations
        .iter()
        .filter(|declaration| declaration.is_class_like() && declaration.name().is_qualified())
        .map(|declaration| declaration.name().clone())
        .collect();
    dotted.sort_by_key(|name| std::cmp::Reverse(name.segments().len()));
    for name in dotted {
        let Some(outer) = name.parent() else {
            continue;
        };
        if host_members(declarations, &outer).is_none() {
            trace!(declaration = %name, "no outer declaration, keeping dotted name");
            continue;
        }
        let Some(index) = declarations.iter().position(|declaration| declaration.name() == &name) else {
            continue;
        };
        let inner = declarations.remove(index);
        let inner = rename(inner, NameEntity::identifier(name.rightmost()));
        if let Some(members) = host_members(declarations, &outer) {
            debug!(outer = %outer, inner = %name.rightmost(), "nesting dotted declaration");
            members.push(MemberModel::Nested(inner));
        }
    }
}

/// Class-likes of submodules named after a class-like of `module`.
fn relocate_submodules(module: &mut ModuleModel) {
    let submodules = std::mem::take(&mut module.submodules);
    for mut submodule in submodules {
        let outer = NameEntity::identifier(submodule.short_name.clone());
        if host_members(&mut module.declarations, &outer).is_some() {
            let (nested, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut submodule.declarations)
                .into_iter()
                .partition(TopLevelModel::is_class_like);
            submodule.declarations = rest;
            if let Some(members) = host_members(&mut module.declarations, &outer) {
                debug!(outer = %outer, count = nested.len(), "nesting submodule declarations");
                members.extend(nested.into_iter().map(MemberModel::Nested));
            }
            if submodule.declarations.is_empty() && submodule.submodules.is_empty() {
                continue;
            }
        }
        module.submodules.push(submodule);
    }
}

struct NestedClasses;

impl ModelLowering for NestedClasses {
    fn lower_module(&mut self, module: ModuleModel) -> ModuleModel {
        let mut module = walk_module(self, module);
        relocate_dotted(&mut module.declarations);
        relocate_submodules(&mut module);
        module
    }
}

/// Move nested class-likes under their outer declaration.
pub fn merge_nested_classes(source_set: SourceSetModel, _diagnostics: &mut DiagnosticBag) -> SourceSetModel {
    NestedClasses.lower_source_set(source_set)
}
