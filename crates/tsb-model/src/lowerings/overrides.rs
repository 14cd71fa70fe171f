//! Override marking.
//!
//! A non-static method or property of a class or interface overrides the
//! nearest ancestor declaring a member with the same merge key. Ancestors
//! are looked up by fully-qualified name within the source set, breadth
//! first; parents outside it never produce an override.

use crate::model::{HeritageModel, MemberModel, ModuleModel, SourceSetModel, TopLevelModel};
use crate::visitor::{ModelLowering, walk_member, walk_module, walk_top_level};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::{debug, trace};
use tsb_common::{DiagnosticBag, NameEntity};

fn overridable_key(member: &MemberModel) -> Option<String> {
    match member {
        MemberModel::Method(method) if !method.static_ => Some(member.merge_key()),
        MemberModel::Property(property) if !property.static_ => Some(member.merge_key()),
        _ => None,
    }
}

fn class_like_parts(declaration: &TopLevelModel) -> Option<(&[MemberModel], &[HeritageModel])> {
    match declaration {
        TopLevelModel::Class(class) => Some((&class.members, &class.parent_entities)),
        TopLevelModel::Interface(interface) => Some((&interface.members, &interface.parent_entities)),
        _ => None,
    }
}

/// Parents without a resolved name are taken to live in `package`.
fn parent_names(package: &NameEntity, parents: &[HeritageModel]) -> Vec<NameEntity> {
    parents
        .iter()
        .map(|parent| {
            parent
                .value
                .fq_name
                .clone()
                .unwrap_or_else(|| NameEntity::qualify(package, &parent.value.value))
        })
        .collect()
}

#[derive(Debug, Default)]
struct ClassLikeEntry {
    keys: FxHashSet<String>,
    parents: Vec<NameEntity>,
}

#[derive(Debug, Default)]
struct ClassLikeIndex {
    entries: FxHashMap<NameEntity, ClassLikeEntry>,
}

impl ClassLikeIndex {
    fn collect_module(&mut self, module: &ModuleModel) {
        for declaration in &module.declarations {
            self.collect_declaration(&module.name, &module.name, declaration);
        }
        for submodule in &module.submodules {
            self.collect_module(submodule);
        }
    }

    /// `scope` qualifies the declaration's own name; `package` qualifies
    /// its unresolved parents.
    fn collect_declaration(&mut self, scope: &NameEntity, package: &NameEntity, declaration: &TopLevelModel) {
        let Some((members, parents)) = class_like_parts(declaration) else {
            return;
        };
        let fq_name = NameEntity::qualify(scope, declaration.name());
        let entry = self.entries.entry(fq_name.clone()).or_default();
        entry.keys.extend(members.iter().filter_map(overridable_key));
        entry.parents.extend(parent_names(package, parents));
        for member in members {
            if let MemberModel::Nested(nested) = member {
                self.collect_declaration(&fq_name, package, nested);
            }
        }
    }

    /// Nearest proper ancestor of `fq_name` declaring a member keyed `key`.
    fn overridden(&self, fq_name: &NameEntity, key: &str) -> Option<&NameEntity> {
        let mut visited: FxHashSet<&NameEntity> = FxHashSet::default();
        visited.insert(fq_name);
        let mut queue: VecDeque<&NameEntity> = self.entries.get(fq_name)?.parents.iter().collect();
        while let Some(name) = queue.pop_front() {
            if !visited.insert(name) {
                continue;
            }
            let Some((ancestor, entry)) = self.entries.get_key_value(name) else {
                continue;
            };
            if entry.keys.contains(key) {
                return Some(ancestor);
            }
            queue.extend(entry.parents.iter());
        }
        None
    }
}

struct Overrides<'a> {
    index: &'a ClassLikeIndex,
    /// Enclosing modules and class-likes, fully qualified, innermost last.
    scopes: Vec<NameEntity>,
    marked: usize,
}

impl ModelLowering for Overrides<'_> {
    fn lower_module(&mut self, module: ModuleModel) -> ModuleModel {
        self.scopes.push(module.name.clone());
        let module = walk_module(self, module);
        self.scopes.pop();
        module
    }

    fn lower_top_level(&mut self, declaration: TopLevelModel) -> TopLevelModel {
        if class_like_parts(&declaration).is_none() {
            return walk_top_level(self, declaration);
        }
        let scope = self.scopes.last().cloned().unwrap_or_else(NameEntity::root);
        self.scopes.push(NameEntity::qualify(&scope, declaration.name()));
        let declaration = walk_top_level(self, declaration);
        self.scopes.pop();
        declaration
    }

    fn lower_member(&mut self, member: MemberModel, owner: &TopLevelModel) -> MemberModel {
        let member = walk_member(self, member, owner);
        if class_like_parts(owner).is_none() {
            return member;
        }
        let index = self.index;
        let Some(owner_name) = self.scopes.last() else {
            return member;
        };
        let Some(ancestor) = overridable_key(&member).and_then(|key| index.overridden(owner_name, &key)) else {
            return member;
        };
        trace!(owner = %owner_name, member = member.name().unwrap_or_default(), ancestor = %ancestor, "marking override");
        let ancestor = ancestor.clone();
        match member {
            MemberModel::Method(mut method) if method.override_.is_none() => {
                method.override_ = Some(ancestor);
                self.marked += 1;
                MemberModel::Method(method)
            }
            MemberModel::Property(mut property) if property.override_.is_none() => {
                property.override_ = Some(ancestor);
                self.marked += 1;
                MemberModel::Property(property)
            }
            member => member,
        }
    }
}

/// Mark members that redeclare an ancestor's member as overriding it.
pub fn lower_overrides(source_set: SourceSetModel, _diagnostics: &mut DiagnosticBag) -> SourceSetModel {
    let mut index = ClassLikeIndex::default();
    for file in &source_set.sources {
        index.collect_module(&file.root);
    }
    let mut overrides = Overrides {
        index: &index,
        scopes: Vec::new(),
        marked: 0,
    };
    let source_set = overrides.lower_source_set(source_set);
    if overrides.marked > 0 {
        debug!(count = overrides.marked, "marked overriding members");
    }
    source_set
}
