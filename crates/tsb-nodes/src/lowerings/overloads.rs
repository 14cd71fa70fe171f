use super::signature_key;
use crate::nodes::{MemberNode, OverloadRole, SourceSetNode, TopLevelNode};
use crate::types::ParameterNode;
use crate::visitor::{NodeLowering, NodeScope, walk_declarations, walk_members};
use rustc_hash::FxHashSet;
use tsb_common::DiagnosticBag;

/// Length of the trailing run of optional, non-vararg parameters.
fn trailing_optional(parameters: &[ParameterNode]) -> usize {
    parameters
        .iter()
        .rev()
        .take_while(|parameter| parameter.optional && !parameter.vararg)
        .count()
}

/// Truncated parameter lists, shortest first.
fn truncations(parameters: &[ParameterNode]) -> impl Iterator<Item = &[ParameterNode]> {
    let optional = trailing_optional(parameters);
    let required = parameters.len() - optional;
    (required..parameters.len()).map(move |len| &parameters[..len])
}

fn member_key(member: &MemberNode) -> Option<String> {
    match member {
        MemberNode::Method(method) => Some(method_key(&method.name, method.static_, &method.parameters)),
        MemberNode::Constructor(constructor) => Some(signature_key("constructor", &constructor.parameters)),
        MemberNode::Property(_) => None,
    }
}

fn method_key(name: &str, static_: bool, parameters: &[ParameterNode]) -> String {
    if static_ {
        signature_key(&format!("static {name}"), parameters)
    } else {
        signature_key(name, parameters)
    }
}

struct Overloads;

impl NodeLowering for Overloads {
    fn lower_members(&mut self, members: Vec<MemberNode>, scope: &NodeScope) -> Vec<MemberNode> {
        let members = walk_members(self, members, scope);
        let mut seen: FxHashSet<String> = members.iter().filter_map(member_key).collect();
        let mut lowered = Vec::with_capacity(members.len());
        for member in members {
            match member {
                MemberNode::Method(mut method) if trailing_optional(&method.parameters) > 0 => {
                    for parameters in truncations(&method.parameters) {
                        if seen.insert(method_key(&method.name, method.static_, parameters)) {
                            let mut variant = method.clone();
                            variant.parameters = parameters.to_vec();
                            variant.overload = Some(OverloadRole::Truncated);
                            lowered.push(MemberNode::Method(variant));
                        }
                    }
                    method.overload = Some(OverloadRole::Complete);
                    lowered.push(MemberNode::Method(method));
                }
                MemberNode::Constructor(mut constructor) if trailing_optional(&constructor.parameters) > 0 => {
                    for parameters in truncations(&constructor.parameters) {
                        if seen.insert(signature_key("constructor", parameters)) {
                            let mut variant = constructor.clone();
                            variant.parameters = parameters.to_vec();
                            variant.overload = Some(OverloadRole::Truncated);
                            lowered.push(MemberNode::Constructor(variant));
                        }
                    }
                    constructor.overload = Some(OverloadRole::Complete);
                    lowered.push(MemberNode::Constructor(constructor));
                }
                member => lowered.push(member),
            }
        }
        lowered
    }

    fn lower_declarations(&mut self, declarations: Vec<TopLevelNode>, scope: &NodeScope) -> Vec<TopLevelNode> {
        let declarations = walk_declarations(self, declarations, scope);
        let mut seen: FxHashSet<String> = declarations
            .iter()
            .filter_map(|declaration| match declaration {
                TopLevelNode::Function(function) => Some(signature_key(function.name.rightmost(), &function.parameters)),
                _ => None,
            })
            .collect();
        let mut lowered = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            match declaration {
                TopLevelNode::Function(mut function) if trailing_optional(&function.parameters) > 0 => {
                    for parameters in truncations(&function.parameters) {
                        if seen.insert(signature_key(function.name.rightmost(), parameters)) {
                            let mut variant = function.clone();
                            variant.parameters = parameters.to_vec();
                            variant.overload = Some(OverloadRole::Truncated);
                            lowered.push(TopLevelNode::Function(variant));
                        }
                    }
                    function.overload = Some(OverloadRole::Complete);
                    lowered.push(TopLevelNode::Function(function));
                }
                declaration => lowered.push(declaration),
            }
        }
        lowered
    }
}

/// A callable with `K` trailing optional parameters becomes `K + 1`
/// overloads, shortest first, ending with the complete signature. Variants
/// that collide with an existing sibling signature are skipped.
pub fn synthesize_overloads(source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    Overloads.lower_source_set(source_set)
}
