use crate::nodes::SourceSetNode;
use crate::types::{TypeNode, UnionTypeNode};
use crate::visitor::{NodeLowering, NodeScope, walk_type};
use tracing::trace;
use tsb_common::DiagnosticBag;

struct NullableUnions;

impl NullableUnions {
    fn collapse(union: UnionTypeNode) -> TypeNode {
        let mut nullable = union.nullable;
        let mut members = Vec::with_capacity(union.params.len());
        for member in union.params {
            match member {
                TypeNode::Union(inner) => {
                    nullable |= inner.nullable;
                    members.extend(inner.params);
                }
                member if member.is_null_like() => nullable = true,
                member => members.push(member),
            }
        }
        match members.len() {
            0 => TypeNode::value("null").make_nullable(),
            1 => {
                let member = members.remove(0);
                trace!(member = %member, nullable, "collapsing union");
                let member_nullable = member.is_nullable();
                member.with_nullable(member_nullable || nullable)
            }
            _ => TypeNode::Union(UnionTypeNode {
                params: members,
                nullable,
            }),
        }
    }
}

impl NodeLowering for NullableUnions {
    fn lower_type(&mut self, ty: TypeNode, scope: &NodeScope) -> TypeNode {
        match walk_type(self, ty, scope) {
            TypeNode::Union(union) => Self::collapse(union),
            ty => ty,
        }
    }
}

/// Derive nullability from unions: `T | null`, `T | undefined` and
/// `T | null | undefined` become a nullable `T`. Unions that keep two or
/// more members stay unions, flagged nullable if a null member was removed.
pub fn lower_nullable(source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    NullableUnions.lower_source_set(source_set)
}
