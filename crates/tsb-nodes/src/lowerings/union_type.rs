use super::signature_key;
use crate::nodes::{ConstructorNode, FunctionNode, MemberNode, MethodNode, SourceSetNode, TopLevelNode};
use crate::types::{ParameterNode, TypeMeta, TypeNode, UnionTypeNode};
use crate::visitor::{NodeLowering, NodeScope, walk_declarations, walk_members};
use rustc_hash::FxHashSet;
use tracing::debug;
use tsb_common::DiagnosticBag;
use tsb_common::limits::MAX_UNION_EXPANSION;

/// Unions of string literals stay unions; the converter renders them as
/// `String` with the literals in a comment.
fn is_string_literal_union(union: &UnionTypeNode) -> bool {
    union.params.iter().all(|member| {
        matches!(member, TypeNode::Value(node)
            if node.value.rightmost() == "String" && matches!(node.meta, Some(TypeMeta::StringLiteral(_))))
    })
}

fn alternatives(parameter: &ParameterNode) -> Vec<TypeNode> {
    match &parameter.type_ {
        TypeNode::Union(union)
            if union.params.len() > 1
                && !union.params.iter().any(TypeNode::is_dynamic)
                && !is_string_literal_union(union) =>
        {
            union
                .params
                .iter()
                .map(|member| {
                    let nullable = member.is_nullable() || union.nullable;
                    member.clone().with_nullable(nullable)
                })
                .collect()
        }
        ty => vec![ty.clone()],
    }
}

/// Every combination of union members, first parameter varying slowest.
/// `None` when nothing expands or the product exceeds the bound.
fn expand(name: &str, parameters: &[ParameterNode]) -> Option<Vec<Vec<ParameterNode>>> {
    let choices: Vec<Vec<TypeNode>> = parameters.iter().map(alternatives).collect();
    if choices.iter().all(|choice| choice.len() == 1) {
        return None;
    }
    let combinations = choices
        .iter()
        .try_fold(1usize, |product, choice| product.checked_mul(choice.len()))
        .unwrap_or(usize::MAX);
    if combinations > MAX_UNION_EXPANSION {
        debug!(name, combinations, "union expansion over the bound, keeping unions");
        return None;
    }
    let mut signatures: Vec<Vec<ParameterNode>> = vec![Vec::with_capacity(parameters.len())];
    for (parameter, choice) in parameters.iter().zip(choices) {
        signatures = signatures
            .into_iter()
            .flat_map(|prefix| {
                choice.iter().map(move |ty| {
                    let mut signature = prefix.clone();
                    signature.push(ParameterNode {
                        type_: ty.clone(),
                        ..parameter.clone()
                    });
                    signature
                })
            })
            .collect();
    }
    let mut seen = FxHashSet::default();
    signatures.retain(|signature| seen.insert(signature_key(name, signature)));
    Some(signatures)
}

struct UnionParameters;

impl NodeLowering for UnionParameters {
    fn lower_declarations(&mut self, declarations: Vec<TopLevelNode>, scope: &NodeScope) -> Vec<TopLevelNode> {
        walk_declarations(self, declarations, scope)
            .into_iter()
            .flat_map(|declaration| match declaration {
                TopLevelNode::Function(function) => {
                    match expand(function.name.rightmost(), &function.parameters) {
                        Some(signatures) => signatures
                            .into_iter()
                            .map(|parameters| {
                                TopLevelNode::Function(FunctionNode {
                                    parameters,
                                    ..function.clone()
                                })
                            })
                            .collect(),
                        None => vec![TopLevelNode::Function(function)],
                    }
                }
                declaration => vec![declaration],
            })
            .collect()
    }

    fn lower_members(&mut self, members: Vec<MemberNode>, scope: &NodeScope) -> Vec<MemberNode> {
        walk_members(self, members, scope)
            .into_iter()
            .flat_map(|member| match member {
                MemberNode::Method(method) => match expand(&method.name, &method.parameters) {
                    Some(signatures) => signatures
                        .into_iter()
                        .map(|parameters| {
                            MemberNode::Method(MethodNode {
                                parameters,
                                ..method.clone()
                            })
                        })
                        .collect(),
                    None => vec![MemberNode::Method(method)],
                },
                MemberNode::Constructor(constructor) => match expand("constructor", &constructor.parameters) {
                    Some(signatures) => signatures
                        .into_iter()
                        .map(|parameters| {
                            MemberNode::Constructor(ConstructorNode {
                                parameters,
                                ..constructor.clone()
                            })
                        })
                        .collect(),
                    None => vec![MemberNode::Constructor(constructor)],
                },
                member => vec![member],
            })
            .collect()
    }
}

/// Split callables whose parameters are typed with unions into one overload
/// per member combination, bounded by `MAX_UNION_EXPANSION`.
pub fn specify_union_type(source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    UnionParameters.lower_source_set(source_set)
}
