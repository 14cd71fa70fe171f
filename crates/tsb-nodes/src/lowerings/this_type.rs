use crate::nodes::SourceSetNode;
use crate::types::{ReferenceNode, ThisTypeNode, TypeMeta, TypeNode, TypeParameterNode, TypeValueNode};
use crate::visitor::{NodeLowering, NodeScope, OwnerContext, walk_type};
use tsb_common::diagnostics::{format_message, messages};
use tsb_common::{DiagnosticBag, DiagnosticKind};

struct ThisTypes<'a> {
    diagnostics: &'a mut DiagnosticBag,
}

fn owner_type(owner: &OwnerContext, nullable: bool) -> TypeNode {
    if owner.generated {
        return TypeNode::Value(TypeValueNode {
            value: "Any".into(),
            params: Vec::new(),
            reference: None,
            nullable,
            meta: Some(TypeMeta::ThisType),
        });
    }
    TypeNode::Value(TypeValueNode {
        value: owner.name.clone(),
        params: owner
            .type_parameters
            .iter()
            .map(|name| {
                TypeNode::TypeParameter(TypeParameterNode {
                    name: name.clone(),
                    nullable: false,
                    meta: None,
                })
            })
            .collect(),
        reference: Some(ReferenceNode::new(owner.uid.clone())),
        nullable,
        meta: None,
    })
}

impl NodeLowering for ThisTypes<'_> {
    fn lower_type(&mut self, ty: TypeNode, scope: &NodeScope) -> TypeNode {
        match walk_type(self, ty, scope) {
            TypeNode::This(ThisTypeNode { nullable }) => match &scope.owner {
                Some(owner) => owner_type(owner, nullable),
                None => self.diagnostics.raise_concern(
                    DiagnosticKind::UnprocessableType,
                    format_message(messages::UNPROCESSABLE_TYPE, &["this", &scope.module.to_string()]),
                    TypeNode::dynamic(Some("this".to_string())),
                ),
            },
            ty => ty,
        }
    }
}

/// `this` becomes the enclosing class or interface applied to its own type
/// parameters. Inside generated interfaces it becomes `Any`.
pub fn lower_this_type(source_set: SourceSetNode, diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    ThisTypes { diagnostics }.lower_source_set(source_set)
}
