use crate::nodes::SourceSetNode;
use crate::types::{TypeMeta, TypeNode};
use crate::visitor::{NodeLowering, NodeScope, walk_type};
use tsb_common::diagnostics::{format_message, messages};
use tsb_common::{DiagnosticBag, DiagnosticKind};

struct Intersections<'a> {
    diagnostics: &'a mut DiagnosticBag,
}

impl NodeLowering for Intersections<'_> {
    fn lower_type(&mut self, ty: TypeNode, scope: &NodeScope) -> TypeNode {
        match walk_type(self, ty, scope) {
            TypeNode::Intersection(intersection) => {
                let Some(first) = intersection.params.first().cloned() else {
                    return self.diagnostics.raise_concern(
                        DiagnosticKind::UnprocessableType,
                        format_message(messages::UNPROCESSABLE_TYPE, &["empty intersection", &scope.module.to_string()]),
                        TypeNode::dynamic(Some("never".to_string())),
                    );
                };
                let nullable = first.is_nullable() || intersection.nullable;
                first
                    .with_nullable(nullable)
                    .with_meta(TypeMeta::Intersection(intersection.params))
            }
            ty => ty,
        }
    }
}

/// `A & B` becomes `A`; the full member list survives as metadata.
pub fn lower_intersection_type(source_set: SourceSetNode, diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    Intersections { diagnostics }.lower_source_set(source_set)
}
