use crate::nodes::SourceSetNode;
use crate::types::{ParameterNode, TypeNode};
use crate::visitor::{NodeLowering, NodeScope, walk_parameter};
use tsb_common::DiagnosticBag;

struct Varargs;

fn element_type(ty: TypeNode) -> TypeNode {
    match ty {
        TypeNode::Value(mut node) if node.value.rightmost() == "Array" && node.params.len() == 1 => node.params.remove(0),
        ty => ty,
    }
}

impl NodeLowering for Varargs {
    fn lower_parameter(&mut self, parameter: ParameterNode, scope: &NodeScope) -> ParameterNode {
        let mut parameter = walk_parameter(self, parameter, scope);
        if parameter.vararg {
            parameter.type_ = element_type(parameter.type_);
        }
        parameter
    }
}

/// `...items: Array<T>` becomes `vararg items: T`.
pub fn lower_varargs(source_set: SourceSetNode, _diagnostics: &mut DiagnosticBag) -> SourceSetNode {
    Varargs.lower_source_set(source_set)
}
