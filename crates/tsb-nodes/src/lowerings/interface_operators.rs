use crate::nodes::{
    ClassLikeNode, ClassLikeReferenceNode, FunctionContext, FunctionNode, InterfaceNode, MemberNode, MethodNode,
    SourceSetNode, TopLevelNode,
};
use crate::visitor::{NodeLowering, NodeScope, walk_declarations};
use tracing::trace;
use tsb_common::{DiagnosticBag, NameEntity};

fn is_lowered_operator(method: &MethodNode) -> bool {
    method.operator && matches!(method.name.as_str(), "get" | "set" | "invoke")
}

fn context(method: &MethodNode) -> FunctionContext {
    let key = || {
        method
            .parameters
            .first()
            .map_or_else(|| "key".to_string(), |parameter| parameter.name.clone())
    };
    match method.name.as_str() {
        "get" => FunctionContext::IndexSignatureGetter { key: key() },
        "set" => FunctionContext::IndexSignatureSetter { key: key() },
        _ => FunctionContext::CallSignature {
            arguments: method.parameters.iter().map(|parameter| parameter.name.clone()).collect(),
        },
    }
}

fn extension(method: MethodNode, interface: &InterfaceNode) -> FunctionNode {
    let context = context(&method);
    let mut type_parameters = interface.type_parameters.clone();
    type_parameters.extend(method.type_parameters);
    FunctionNode {
        name: NameEntity::identifier(method.name),
        parameters: method.parameters,
        return_type: method.return_type,
        type_parameters,
        export_qualifier: None,
        inline: true,
        operator: true,
        extend: Some(ClassLikeReferenceNode {
            uid: interface.uid.clone(),
            name: interface.name.clone(),
            type_parameters: interface
                .type_parameters
                .iter()
                .map(|parameter| parameter.name.clone())
                .collect(),
        }),
        context: Some(context),
        overload: method.overload,
    }
}

/// Split the operator methods off `interface`.
fn extract(mut interface: InterfaceNode) -> (InterfaceNode, Vec<FunctionNode>) {
    let (operators, members): (Vec<MemberNode>, Vec<MemberNode>) = interface
        .members
        .drain(..)
        .partition(|member| matches!(member, MemberNode::Method(method) if is_lowered_operator(method)));
    interface.members = members;
    let functions = operators
        .into_iter()
        .filter_map(|member| match member {
            MemberNode::Method(method) => Some(extension(method, &interface)),
            _ => None,
        })
        .collect();
    (interface, functions)
}

struct InterfaceOperators;

impl NodeLowering for InterfaceOperators {
    fn lower_declarations(&mut self, declarations: Vec<TopLevelNode>, scope: &NodeScope) -> Vec<TopLevelNode> {
        let declarations = walk_declarations(self, declarations, scope);
        let mut lowered = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            match declaration {
                TopLevelNode::ClassLike(ClassLikeNode::Interface(interface)) => {
                    let (interface, functions) = extract(interface);
                    if !functions.is_empty() {
                        trace!(interface = %interface.name, count = functions.len(), "extracted operators");
                    }
                    lowered.push(TopLevelNode::ClassLike(ClassLikeNode::Interface(interface)));
                    lowered.extend(functions.into_iter().map(TopLevelNode::Function));
                }
                declaration => lowered.push(declaration),
            }
        }
        lowered
    }
}

/// Interface index signatures and call signatures become inline operator
/// extension functions following the interface.
pub fn lower_interface_operators(source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    InterfaceOperators.lower_source_set(source_set)
}
