use crate::nodes::SourceSetNode;
use crate::types::{TypeMeta, TypeNode, TypeValueNode};
use crate::visitor::{NodeLowering, NodeScope, walk_type};
use tsb_common::{DiagnosticBag, NameEntity};

/// Target name and forced nullability of a source primitive.
fn primitive(name: &str) -> Option<(&'static str, bool)> {
    let target = match name {
        "string" => ("String", false),
        "number" => ("Number", false),
        "boolean" => ("Boolean", false),
        "any" | "unknown" => ("Any", true),
        "void" => ("Unit", false),
        "object" => ("Any", false),
        "never" => ("Nothing", false),
        "null" | "undefined" => ("Nothing", true),
        "symbol" | "bigint" => (crate::types::DYNAMIC, false),
        _ => return None,
    };
    Some(target)
}

struct Primitives;

impl NodeLowering for Primitives {
    fn lower_type(&mut self, ty: TypeNode, scope: &NodeScope) -> TypeNode {
        match walk_type(self, ty, scope) {
            TypeNode::Value(node)
                if node.reference.is_none() && node.params.is_empty() && !node.value.is_qualified() =>
            {
                match primitive(node.value.rightmost()) {
                    Some((target, forced_nullable)) => {
                        let meta = if target == crate::types::DYNAMIC {
                            Some(TypeMeta::Description(node.value.to_string()))
                        } else {
                            node.meta
                        };
                        TypeNode::Value(TypeValueNode {
                            value: NameEntity::identifier(target),
                            nullable: node.nullable || forced_nullable,
                            meta,
                            ..node
                        })
                    }
                    None => TypeNode::Value(node),
                }
            }
            ty => ty,
        }
    }
}

/// Rewrite source primitives into target types. Literal metadata survives,
/// so `"a"` ends up as `String` carrying its literal.
pub fn lower_primitives(source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    Primitives.lower_source_set(source_set)
}
