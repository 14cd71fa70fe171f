//! Class + interface declaration merging.
//!
//! A class and one or more interfaces sharing a fully-qualified name
//! become a single class at the position of the first occurrence. Members
//! accumulate in encounter order; interface members are not open unless
//! they override something.

use super::{fq_name, merge_members, push_unique};
use crate::model::{
    ClassModel, InterfaceModel, MemberModel, ModuleModel, ObjectModel, SourceSetModel, TopLevelModel,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use tsb_common::{DiagnosticBag, NameEntity};

#[derive(Debug, Default)]
struct Group {
    declarations: Vec<TopLevelModel>,
    has_class: bool,
    has_interface: bool,
}

fn collect(module: &ModuleModel, groups: &mut FxHashMap<NameEntity, Group>) {
    for declaration in &module.declarations {
        let (is_class, is_interface) = match declaration {
            TopLevelModel::Class(_) => (true, false),
            TopLevelModel::Interface(_) => (false, true),
            _ => continue,
        };
        let group = groups.entry(fq_name(module, declaration)).or_default();
        group.has_class |= is_class;
        group.has_interface |= is_interface;
        group.declarations.push(declaration.clone());
    }
    for submodule in &module.submodules {
        collect(submodule, groups);
    }
}

fn close_members(members: Vec<MemberModel>) -> Vec<MemberModel> {
    members
        .into_iter()
        .map(|member| match member {
            MemberModel::Method(mut method) if method.override_.is_none() => {
                method.open = false;
                MemberModel::Method(method)
            }
            MemberModel::Property(mut property) if property.override_.is_none() => {
                property.open = false;
                MemberModel::Property(property)
            }
            member => member,
        })
        .collect()
}

fn merge_companion(target: &mut Option<ObjectModel>, incoming: Option<ObjectModel>) {
    match (target.as_mut(), incoming) {
        (Some(existing), Some(incoming)) => {
            merge_members(&mut existing.members, incoming.members);
            push_unique(&mut existing.parent_entities, incoming.parent_entities);
        }
        (None, incoming) => *target = incoming,
        (Some(_), None) => {}
    }
}

fn merged_class(declarations: Vec<TopLevelModel>) -> Option<ClassModel> {
    let mut class: Option<ClassModel> = None;
    let mut interfaces: Vec<InterfaceModel> = Vec::new();
    let mut members = Vec::new();
    for declaration in declarations {
        match declaration {
            TopLevelModel::Class(incoming) => match class.as_mut() {
                Some(existing) => {
                    merge_members(&mut members, incoming.members);
                    push_unique(&mut existing.parent_entities, incoming.parent_entities);
                    push_unique(&mut existing.annotations, incoming.annotations);
                    merge_companion(&mut existing.companion_object, incoming.companion_object);
                    if existing.primary_constructor.is_none() {
                        existing.primary_constructor = incoming.primary_constructor;
                    }
                }
                None => {
                    let mut incoming = incoming;
                    merge_members(&mut members, std::mem::take(&mut incoming.members));
                    class = Some(incoming);
                }
            },
            TopLevelModel::Interface(mut interface) => {
                merge_members(&mut members, close_members(std::mem::take(&mut interface.members)));
                interfaces.push(interface);
            }
            _ => {}
        }
    }
    let mut class = class?;
    for interface in interfaces {
        if class.type_parameters.is_empty() {
            class.type_parameters = interface.type_parameters;
        }
        push_unique(&mut class.parent_entities, interface.parent_entities);
        push_unique(&mut class.annotations, interface.annotations);
        merge_companion(&mut class.companion_object, interface.companion_object);
    }
    class.members = members;
    Some(class)
}

struct ClassMerger {
    merged: FxHashMap<NameEntity, ClassModel>,
    emitted: FxHashSet<NameEntity>,
}

impl ClassMerger {
    fn lower_module(&mut self, mut module: ModuleModel) -> ModuleModel {
        let declarations = std::mem::take(&mut module.declarations);
        for declaration in declarations {
            let fq = fq_name(&module, &declaration);
            if !self.merged.contains_key(&fq) {
                module.declarations.push(declaration);
                continue;
            }
            if self.emitted.insert(fq.clone())
                && let Some(class) = self.merged.remove(&fq)
            {
                module.declarations.push(TopLevelModel::Class(class));
            }
        }
        module.submodules = std::mem::take(&mut module.submodules)
            .into_iter()
            .map(|submodule| self.lower_module(submodule))
            .collect();
        module
    }
}

/// Merge classes and interfaces sharing a fully-qualified name.
pub fn merge_classes_and_interfaces(source_set: SourceSetModel, _diagnostics: &mut DiagnosticBag) -> SourceSetModel {
    let mut groups = FxHashMap::default();
    for file in &source_set.sources {
        collect(&file.root, &mut groups);
    }
    let merged: FxHashMap<NameEntity, ClassModel> = groups
        .into_iter()
        .filter(|(_, group)| group.has_class && group.has_interface)
        .filter_map(|(fq, group)| {
            debug!(declaration = %fq, parts = group.declarations.len(), "merging class and interfaces");
            merged_class(group.declarations).map(|class| (fq, class))
        })
        .collect();
    if merged.is_empty() {
        return source_set;
    }
    let mut merger = ClassMerger {
        merged,
        emitted: FxHashSet::default(),
    };
    SourceSetModel {
        source_name: source_set.source_name,
        sources: source_set
            .sources
            .into_iter()
            .map(|mut file| {
                file.root = merger.lower_module(file.root);
                file
            })
            .collect(),
    }
}
