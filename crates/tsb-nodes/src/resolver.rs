//! Cross-file reference resolution.
//!
//! Resolution is two-pass. `collect` walks every document root of the
//! given source sets and records `uid -> (node, fully-qualified name)` for
//! each class-like, enum and type alias. Afterwards the resolver is
//! read-only and answers name queries for the remaining stages.
//!
//! | Reference | Resolves to |
//! |-----------|-------------|
//! | mapped uid | its recorded fq name |
//! | unmapped library uid | `<LIBROOT>.<name>` |
//! | none, name is a target std-lib entity | `<LIBROOT>.<name>` |
//! | none | the bare local name |
//! | unmapped source uid | unresolved, the caller erases the type |

use crate::nodes::{ClassLikeNode, DocumentRootNode, SourceSetNode, TopLevelNode, TypeAliasNode};
use crate::types::ReferenceNode;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use tsb_common::{NameEntity, Uid, stdlib};
use tsb_declarations::Origin;

/// Declaration a uid stands for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedNode {
    ClassLike(ClassLikeNode),
    TypeAlias(TypeAliasNode),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FqNode {
    pub node: ResolvedNode,
    pub fq_name: NameEntity,
}

/// Outcome of resolving a possibly-referenced name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Fully-qualified target name.
    Qualified(NameEntity),
    /// No reference; the name is used as written.
    Local,
    /// The reference points at a uid nothing declares.
    Unresolved(Uid),
}

/// `package` re-rooted under `<LIBROOT>` unless it already is.
fn library_package(package: &NameEntity) -> NameEntity {
    if package.is_library_rooted() {
        package.clone()
    } else if package.is_root() {
        NameEntity::library_root()
    } else {
        package.prepend(&NameEntity::library_root())
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReferenceResolver {
    entries: IndexMap<Uid, FqNode>,
    by_name: FxHashMap<NameEntity, Uid>,
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver over `source_sets`, in order.
    pub fn collect<'a>(source_sets: impl IntoIterator<Item = &'a SourceSetNode>) -> Self {
        let mut resolver = Self::new();
        for source_set in source_sets {
            resolver.collect_source_set(source_set);
        }
        resolver
    }

    pub fn collect_source_set(&mut self, source_set: &SourceSetNode) {
        for file in &source_set.sources {
            self.collect_root(&file.root, false);
        }
        debug!(sources = ?source_set.source_name, entries = self.entries.len(), "collected references");
    }

    /// `library` is set once any enclosing root is of library origin; such
    /// names always live under `<LIBROOT>`.
    fn collect_root(&mut self, root: &DocumentRootNode, library: bool) {
        let library = library || root.origin == Origin::Library;
        let package = if library {
            library_package(&root.qualified_package_name)
        } else {
            root.qualified_package_name.clone()
        };
        for declaration in &root.declarations {
            match declaration {
                TopLevelNode::ClassLike(class_like) => {
                    let fq_name = NameEntity::qualify(&package, class_like.name());
                    self.record(class_like.uid().clone(), ResolvedNode::ClassLike(class_like.clone()), fq_name);
                }
                TopLevelNode::TypeAlias(alias) => {
                    let fq_name = NameEntity::qualify(&package, &alias.name);
                    self.record(alias.uid.clone(), ResolvedNode::TypeAlias(alias.clone()), fq_name);
                }
                TopLevelNode::Module(nested) => self.collect_root(nested, library),
                TopLevelNode::Object(_) | TopLevelNode::Function(_) | TopLevelNode::Variable(_) => {}
            }
        }
    }

    fn record(&mut self, uid: Uid, node: ResolvedNode, fq_name: NameEntity) {
        trace!(uid = %uid, fq_name = %fq_name, "recording declaration");
        // The first declaration of a name owns it; merged declarations
        // share the name anyway.
        self.by_name.entry(fq_name.clone()).or_insert_with(|| uid.clone());
        self.entries.insert(uid, FqNode { node, fq_name });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, uid: &Uid) -> Option<&FqNode> {
        self.entries.get(uid)
    }

    pub fn fq_name(&self, uid: &Uid) -> Option<&NameEntity> {
        self.entries.get(uid).map(|entry| &entry.fq_name)
    }

    /// Uid declared under `fq_name`.
    pub fn uid_of(&self, fq_name: &NameEntity) -> Option<&Uid> {
        self.by_name.get(fq_name)
    }

    /// `uid -> fq name` pairs in collection order.
    pub fn fq_names(&self) -> impl Iterator<Item = (&Uid, &NameEntity)> {
        self.entries.iter().map(|(uid, entry)| (uid, &entry.fq_name))
    }

    /// Find the declaration `name` refers to from inside `module`: the
    /// enclosing module chain innermost first, then the file root, then the
    /// library root.
    pub fn lookup(&self, module: &NameEntity, name: &NameEntity) -> Option<&Uid> {
        let mut package = Some(module.clone());
        while let Some(current) = package {
            if let Some(uid) = self.by_name.get(&NameEntity::qualify(&current, name)) {
                return Some(uid);
            }
            package = current.parent();
        }
        self.by_name
            .get(name)
            .or_else(|| self.by_name.get(&stdlib::library_name(name)))
    }

    /// Resolve `name`, optionally carrying `reference`, to its target name.
    pub fn resolve(&self, reference: Option<&ReferenceNode>, name: &NameEntity) -> Resolution {
        match reference {
            Some(reference) => match self.fq_name(&reference.uid) {
                Some(fq_name) => Resolution::Qualified(fq_name.clone()),
                None if reference.uid.is_library() => Resolution::Qualified(stdlib::library_name(name)),
                None => Resolution::Unresolved(reference.uid.clone()),
            },
            None if stdlib::is_target_entity(name) => Resolution::Qualified(stdlib::library_name(name)),
            None => Resolution::Local,
        }
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
