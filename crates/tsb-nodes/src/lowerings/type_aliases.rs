//! Type alias lowerings.
//!
//! `resolve_type_aliases` inlines aliases of union types at their use
//! sites, so the union passes see the union instead of an opaque name.
//! `move_type_aliases_outside` relocates aliases out of roots bound to a JS
//! module or qualifier: such files admit external declarations only.

use crate::nodes::{DocumentRootNode, SourceFileNode, SourceSetNode, TopLevelNode, TypeAliasNode};
use crate::types::TypeNode;
use crate::visitor::{NodeLowering, NodeScope, walk_top_level, walk_type};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use tsb_common::{DiagnosticBag, NameEntity, Uid};

fn all_aliases(source_set: &SourceSetNode) -> Vec<&TypeAliasNode> {
    let mut aliases = Vec::new();
    let mut stack: Vec<&DocumentRootNode> = source_set.sources.iter().map(|file| &file.root).collect();
    while let Some(root) = stack.pop() {
        for declaration in &root.declarations {
            match declaration {
                TopLevelNode::TypeAlias(alias) => aliases.push(alias),
                TopLevelNode::Module(nested) => stack.push(nested),
                _ => {}
            }
        }
    }
    aliases
}

fn is_union_body(ty: &TypeNode, unions: &FxHashMap<Uid, TypeAliasNode>) -> bool {
    match ty {
        TypeNode::Union(_) => true,
        TypeNode::Value(node) => node
            .reference
            .as_ref()
            .is_some_and(|reference| unions.contains_key(&reference.uid)),
        _ => false,
    }
}

/// Aliases whose body is a union, directly or through a chain of such
/// aliases.
fn union_aliases(source_set: &SourceSetNode) -> FxHashMap<Uid, TypeAliasNode> {
    let aliases = all_aliases(source_set);
    let mut unions: FxHashMap<Uid, TypeAliasNode> = FxHashMap::default();
    loop {
        let before = unions.len();
        for alias in &aliases {
            if !unions.contains_key(&alias.uid) && is_union_body(&alias.type_reference, &unions) {
                unions.insert(alias.uid.clone(), (*alias).clone());
            }
        }
        if unions.len() == before {
            return unions;
        }
    }
}

/// `ty` with the type parameters named in `bindings` replaced. A nullable
/// parameter makes its argument nullable.
fn substitute(ty: TypeNode, bindings: &FxHashMap<NameEntity, TypeNode>) -> TypeNode {
    let all = |types: Vec<TypeNode>| -> Vec<TypeNode> { types.into_iter().map(|ty| substitute(ty, bindings)).collect() };
    match ty {
        TypeNode::TypeParameter(parameter) => match bindings.get(&parameter.name) {
            Some(argument) => {
                let nullable = parameter.nullable || argument.is_nullable();
                argument.clone().with_nullable(nullable)
            }
            None => TypeNode::TypeParameter(parameter),
        },
        TypeNode::Value(mut node) => {
            node.params = all(node.params);
            TypeNode::Value(node)
        }
        TypeNode::Function(mut node) => {
            for parameter in &mut node.parameters {
                parameter.type_ = substitute(parameter.type_.clone(), bindings);
            }
            node.return_type = Box::new(substitute(*node.return_type, bindings));
            TypeNode::Function(node)
        }
        TypeNode::Union(mut node) => {
            node.params = all(node.params);
            TypeNode::Union(node)
        }
        TypeNode::Tuple(mut node) => {
            node.params = all(node.params);
            TypeNode::Tuple(node)
        }
        TypeNode::Intersection(mut node) => {
            node.params = all(node.params);
            TypeNode::Intersection(node)
        }
        TypeNode::GeneratedInterface(mut node) => {
            node.type_arguments = all(node.type_arguments);
            TypeNode::GeneratedInterface(node)
        }
        ty @ TypeNode::This(_) => ty,
    }
}

struct AliasInliner {
    aliases: FxHashMap<Uid, TypeAliasNode>,
    /// Aliases being expanded; a recursive alias stays a reference.
    expanding: Vec<Uid>,
    inlined: usize,
}

impl NodeLowering for AliasInliner {
    fn lower_top_level(&mut self, declaration: TopLevelNode, scope: &NodeScope) -> TopLevelNode {
        let TopLevelNode::TypeAlias(alias) = &declaration else {
            return walk_top_level(self, declaration, scope);
        };
        self.expanding.push(alias.uid.clone());
        let declaration = walk_top_level(self, declaration, scope);
        self.expanding.pop();
        declaration
    }

    fn lower_type(&mut self, ty: TypeNode, scope: &NodeScope) -> TypeNode {
        let ty = walk_type(self, ty, scope);
        let TypeNode::Value(node) = &ty else {
            return ty;
        };
        let Some(alias) = node.reference.as_ref().and_then(|reference| self.aliases.get(&reference.uid)) else {
            return ty;
        };
        if self.expanding.contains(&alias.uid) || node.params.len() != alias.type_parameters.len() {
            return ty;
        }
        trace!(alias = %alias.name, module = %scope.module, "inlining type alias");
        let bindings: FxHashMap<NameEntity, TypeNode> = alias
            .type_parameters
            .iter()
            .map(|parameter| parameter.name.clone())
            .zip(node.params.iter().cloned())
            .collect();
        let body = substitute(alias.type_reference.clone(), &bindings);
        let nullable = node.nullable || body.is_nullable();
        self.expanding.push(alias.uid.clone());
        let body = self.lower_type(body, scope);
        self.expanding.pop();
        self.inlined += 1;
        body.with_nullable(nullable)
    }
}

/// References to aliases of union types become the union itself, with the
/// alias's type parameters bound to the reference's arguments. The alias
/// declarations stay.
pub fn resolve_type_aliases(source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    let aliases = union_aliases(&source_set);
    if aliases.is_empty() {
        return source_set;
    }
    let mut inliner = AliasInliner {
        aliases,
        expanding: Vec::new(),
        inlined: 0,
    };
    let source_set = inliner.lower_source_set(source_set);
    debug!(aliases = inliner.aliases.len(), references = inliner.inlined, "inlined union type aliases");
    source_set
}

/// Take the aliases out of `root` and every nested root bound to JS,
/// collecting them into unbound roots of the same package.
fn extract_aliases(root: &mut DocumentRootNode, moved: &mut Vec<DocumentRootNode>) {
    for declaration in &mut root.declarations {
        if let TopLevelNode::Module(nested) = declaration {
            extract_aliases(nested, moved);
        }
    }
    if root.js_module.is_none() && root.js_qualifier.is_none() {
        return;
    }
    let (aliases, rest): (Vec<TopLevelNode>, Vec<TopLevelNode>) = std::mem::take(&mut root.declarations)
        .into_iter()
        .partition(|declaration| matches!(declaration, TopLevelNode::TypeAlias(_)));
    root.declarations = rest;
    if aliases.is_empty() {
        return;
    }
    debug!(module = %root.qualified_package_name, count = aliases.len(), "moving type aliases out of bound module");
    moved.push(DocumentRootNode {
        uid: Uid::new(format!("{}_aliases", root.uid)),
        package_name: root.package_name.clone(),
        qualified_package_name: root.qualified_package_name.clone(),
        declarations: aliases,
        js_module: None,
        js_qualifier: None,
        origin: root.origin,
    });
}

/// Aliases declared under a `JsModule` or `JsQualifier` root move to an
/// extra file root of the same package and file name, without either
/// binding. File roots are never merged, so the binding stays off.
pub fn move_type_aliases_outside(mut source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    let mut extra = Vec::new();
    for file in &mut source_set.sources {
        let mut moved = Vec::new();
        extract_aliases(&mut file.root, &mut moved);
        extra.extend(moved.into_iter().map(|root| SourceFileNode {
            file_name: file.file_name.clone(),
            root,
            referenced_files: Vec::new(),
        }));
    }
    source_set.sources.extend(extra);
    source_set
}
