use crate::types::{TypeMeta, TypeNode, TypeParameterNode};
use crate::visitor::{NodeLowering, NodeScope, walk_type};
use crate::nodes::SourceSetNode;
use tsb_common::DiagnosticBag;

struct TypeParameterReferences;

impl NodeLowering for TypeParameterReferences {
    fn lower_type(&mut self, ty: TypeNode, scope: &NodeScope) -> TypeNode {
        match walk_type(self, ty, scope) {
            TypeNode::Value(node)
                if node.params.is_empty() && node.reference.is_none() && !node.value.is_qualified() =>
            {
                match scope.type_parameter(&node.value) {
                    Some(parameter) => {
                        let meta = if parameter.constraints.is_empty() {
                            node.meta
                        } else {
                            Some(TypeMeta::Constraint(parameter.constraints.clone()))
                        };
                        TypeNode::TypeParameter(TypeParameterNode {
                            name: node.value,
                            nullable: node.nullable,
                            meta,
                        })
                    }
                    None => TypeNode::Value(node),
                }
            }
            ty => ty,
        }
    }
}

/// Names of in-scope generic parameters become type parameter references
/// carrying the parameter's constraints.
pub fn introduce_type_nodes(source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    TypeParameterReferences.lower_source_set(source_set)
}
