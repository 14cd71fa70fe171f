use crate::nodes::{HeritageNode, SourceSetNode};
use crate::resolver::ReferenceResolver;
use crate::types::{ReferenceNode, TypeNode};
use crate::visitor::{NodeLowering, NodeScope, walk_heritage, walk_type};
use tracing::trace;
use tsb_common::{DiagnosticBag, NameEntity};

struct QualifiedNames<'a> {
    resolver: &'a ReferenceResolver,
}

impl QualifiedNames<'_> {
    fn reference(&self, name: &NameEntity, scope: &NodeScope) -> Option<ReferenceNode> {
        let uid = self.resolver.lookup(&scope.module, name)?;
        trace!(name = %name, module = %scope.module, uid = %uid, "resolved name");
        Some(ReferenceNode::new(uid.clone()))
    }
}

impl NodeLowering for QualifiedNames<'_> {
    fn lower_type(&mut self, ty: TypeNode, scope: &NodeScope) -> TypeNode {
        match walk_type(self, ty, scope) {
            TypeNode::Value(mut node) if node.reference.is_none() => {
                node.reference = self.reference(&node.value, scope);
                TypeNode::Value(node)
            }
            TypeNode::GeneratedInterface(mut node) if node.reference.is_none() => {
                node.reference = self.reference(&node.name, scope);
                TypeNode::GeneratedInterface(node)
            }
            ty => ty,
        }
    }

    fn lower_heritage(&mut self, heritage: HeritageNode, scope: &NodeScope) -> HeritageNode {
        let mut heritage = walk_heritage(self, heritage, scope);
        if heritage.reference.is_none() {
            heritage.reference = self.reference(&heritage.name, scope);
        }
        heritage
    }
}

/// Attach uid references to named types and heritage clauses by scope
/// lookup. `library` supplies declarations addressable from every file.
pub fn introduce_qualified_names(
    source_set: SourceSetNode,
    library: Option<&SourceSetNode>,
    _diagnostics: &mut DiagnosticBag,
) -> SourceSetNode {
    let resolver = ReferenceResolver::collect(library.into_iter().chain(std::iter::once(&source_set)));
    QualifiedNames { resolver: &resolver }.lower_source_set(source_set)
}
