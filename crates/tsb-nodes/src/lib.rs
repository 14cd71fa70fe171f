//! Node Model: the uid-addressed intermediate representation.
//!
//! - `introduce_nodes` converts a declaration source set into nodes
//! - `ReferenceResolver` maps uids to fully-qualified names
//! - `lowerings` holds the fixed-order node pipeline stages
//!
//! Every node-level pass is a total function
//! `(SourceSetNode, &mut DiagnosticBag) -> SourceSetNode`.

pub mod types;
pub use types::{
    DYNAMIC, FieldPromotion, ParameterNode, ReferenceNode, ReferenceOrigin, TypeMeta, TypeNode, TypeValueNode,
};

pub mod nodes;
pub use nodes::*;

pub mod visitor;
pub use visitor::{NodeLowering, NodeScope};

pub mod introduce;
pub use introduce::introduce_nodes;

pub mod resolver;
pub use resolver::{ReferenceResolver, Resolution};

pub mod lowerings;
