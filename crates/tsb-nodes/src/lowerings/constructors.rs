use crate::nodes::{ClassLikeNode, ClassNode, MemberNode, PropertyNode, SourceSetNode};
use crate::types::FieldPromotion;
use crate::visitor::{NodeLowering, NodeScope, walk_class_like};
use rustc_hash::FxHashSet;
use tsb_common::DiagnosticBag;

/// Parameter properties become class properties, first occurrence wins.
fn promote_fields(class: &mut ClassNode) -> Vec<MemberNode> {
    let mut names: FxHashSet<String> = class
        .members
        .iter()
        .filter_map(|member| member.name().map(str::to_string))
        .collect();
    let mut promoted = Vec::new();
    for member in &mut class.members {
        let MemberNode::Constructor(constructor) = member else {
            continue;
        };
        for parameter in &mut constructor.parameters {
            let Some(field) = parameter.field.take() else {
                continue;
            };
            if !names.insert(parameter.name.clone()) {
                continue;
            }
            promoted.push(MemberNode::Property(PropertyNode {
                name: parameter.name.clone(),
                type_: parameter.type_.clone(),
                type_parameters: Vec::new(),
                owner: Some(class.uid.clone()),
                static_: false,
                open: true,
                getter: true,
                setter: field == FieldPromotion::Mutable,
                optional: false,
            }));
        }
    }
    promoted
}

fn rearrange(mut class: ClassNode) -> ClassNode {
    let mut members = promote_fields(&mut class);
    let constructors = class
        .members
        .iter()
        .filter(|member| matches!(member, MemberNode::Constructor(_)))
        .count();
    for member in class.members {
        match member {
            MemberNode::Constructor(constructor) if constructors == 1 && class.primary_constructor.is_none() => {
                class.primary_constructor = Some(constructor);
            }
            member => members.push(member),
        }
    }
    class.members = members;
    class
}

struct Constructors;

impl NodeLowering for Constructors {
    fn lower_class_like(&mut self, declaration: ClassLikeNode, scope: &NodeScope) -> ClassLikeNode {
        match walk_class_like(self, declaration, scope) {
            ClassLikeNode::Class(class) => ClassLikeNode::Class(rearrange(class)),
            declaration => declaration,
        }
    }
}

/// Promote constructor parameter properties to class properties and make
/// a lone constructor the class's primary constructor.
pub fn rearrange_constructors(source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    Constructors.lower_source_set(source_set)
}
