//! Consuming rewriter over the Node Model.
//!
//! Mirrors the declaration visitor: every hook takes its subtree by value,
//! the default forwards to a `walk_*` function that rebuilds the node from
//! lowered children. List hooks (`lower_declarations`, `lower_members`) let
//! a lowering remove or expand entries.

use crate::nodes::{
    ClassLikeNode, ConstructorNode, DocumentRootNode, HeritageNode, MemberNode, SourceFileNode,
    SourceSetNode, TopLevelNode, TypeParameterDefinitionNode,
};
use crate::types::{ParameterNode, TypeMeta, TypeNode};
use tsb_common::{NameEntity, Uid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerKind {
    Class,
    Interface,
}

/// The class-like whose members are being lowered.
#[derive(Clone, Debug)]
pub struct OwnerContext {
    pub uid: Uid,
    pub name: NameEntity,
    pub kind: OwnerKind,
    pub type_parameters: Vec<NameEntity>,
    pub generated: bool,
}

#[derive(Clone, Debug)]
pub struct NodeScope {
    /// Qualified package name of the enclosing document root.
    pub module: NameEntity,
    pub owner: Option<OwnerContext>,
    /// Generic parameters visible at this point, outermost first.
    pub type_parameters: Vec<TypeParameterDefinitionNode>,
}

impl NodeScope {
    pub fn new(module: NameEntity) -> Self {
        Self {
            module,
            owner: None,
            type_parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type_parameters(&self, type_parameters: &[TypeParameterDefinitionNode]) -> Self {
        let mut scope = self.clone();
        scope.type_parameters.extend(type_parameters.iter().cloned());
        scope
    }

    #[must_use]
    pub fn with_owner(&self, owner: OwnerContext) -> Self {
        Self {
            owner: Some(owner),
            ..self.clone()
        }
    }

    /// Innermost type parameter named `name`.
    pub fn type_parameter(&self, name: &NameEntity) -> Option<&TypeParameterDefinitionNode> {
        self.type_parameters.iter().rev().find(|parameter| &parameter.name == name)
    }
}

pub trait NodeLowering {
    fn lower_source_set(&mut self, source_set: SourceSetNode) -> SourceSetNode {
        walk_source_set(self, source_set)
    }

    fn lower_document_root(&mut self, root: DocumentRootNode, scope: &NodeScope) -> DocumentRootNode {
        walk_document_root(self, root, scope)
    }

    fn lower_declarations(&mut self, declarations: Vec<TopLevelNode>, scope: &NodeScope) -> Vec<TopLevelNode> {
        walk_declarations(self, declarations, scope)
    }

    fn lower_top_level(&mut self, declaration: TopLevelNode, scope: &NodeScope) -> TopLevelNode {
        walk_top_level(self, declaration, scope)
    }

    fn lower_class_like(&mut self, declaration: ClassLikeNode, scope: &NodeScope) -> ClassLikeNode {
        walk_class_like(self, declaration, scope)
    }

    fn lower_members(&mut self, members: Vec<MemberNode>, scope: &NodeScope) -> Vec<MemberNode> {
        walk_members(self, members, scope)
    }

    fn lower_member(&mut self, member: MemberNode, scope: &NodeScope) -> MemberNode {
        walk_member(self, member, scope)
    }

    fn lower_heritage(&mut self, heritage: HeritageNode, scope: &NodeScope) -> HeritageNode {
        walk_heritage(self, heritage, scope)
    }

    fn lower_parameter(&mut self, parameter: ParameterNode, scope: &NodeScope) -> ParameterNode {
        walk_parameter(self, parameter, scope)
    }

    fn lower_type(&mut self, ty: TypeNode, scope: &NodeScope) -> TypeNode {
        walk_type(self, ty, scope)
    }
}

// =============================================================================
// Walkers
// =============================================================================

pub fn walk_source_set<L: NodeLowering + ?Sized>(lowering: &mut L, source_set: SourceSetNode) -> SourceSetNode {
    let sources = source_set
        .sources
        .into_iter()
        .map(|file| {
            let scope = NodeScope::new(file.root.qualified_package_name.clone());
            SourceFileNode {
                root: lowering.lower_document_root(file.root, &scope),
                ..file
            }
        })
        .collect();
    SourceSetNode {
        source_name: source_set.source_name,
        sources,
    }
}

pub fn walk_document_root<L: NodeLowering + ?Sized>(
    lowering: &mut L,
    root: DocumentRootNode,
    scope: &NodeScope,
) -> DocumentRootNode {
    DocumentRootNode {
        declarations: lowering.lower_declarations(root.declarations, scope),
        ..root
    }
}

pub fn walk_declarations<L: NodeLowering + ?Sized>(
    lowering: &mut L,
    declarations: Vec<TopLevelNode>,
    scope: &NodeScope,
) -> Vec<TopLevelNode> {
    declarations
        .into_iter()
        .map(|declaration| lowering.lower_top_level(declaration, scope))
        .collect()
}

pub fn walk_top_level<L: NodeLowering + ?Sized>(
    lowering: &mut L,
    declaration: TopLevelNode,
    scope: &NodeScope,
) -> TopLevelNode {
    match declaration {
        TopLevelNode::ClassLike(class_like) => TopLevelNode::ClassLike(lowering.lower_class_like(class_like, scope)),
        TopLevelNode::Object(mut object) => {
            object.parent_entities = lower_heritages(lowering, object.parent_entities, scope);
            object.members = lowering.lower_members(object.members, scope);
            TopLevelNode::Object(object)
        }
        TopLevelNode::TypeAlias(mut alias) => {
            let scope = scope.with_type_parameters(&alias.type_parameters);
            alias.type_parameters = lower_type_parameters(lowering, alias.type_parameters, &scope);
            alias.type_reference = lowering.lower_type(alias.type_reference, &scope);
            TopLevelNode::TypeAlias(alias)
        }
        TopLevelNode::Function(mut function) => {
            let scope = scope.with_type_parameters(&function.type_parameters);
            function.type_parameters = lower_type_parameters(lowering, function.type_parameters, &scope);
            function.parameters = lower_parameters(lowering, function.parameters, &scope);
            function.return_type = lowering.lower_type(function.return_type, &scope);
            TopLevelNode::Function(function)
        }
        TopLevelNode::Variable(mut variable) => {
            variable.type_ = lowering.lower_type(variable.type_, scope);
            TopLevelNode::Variable(variable)
        }
        TopLevelNode::Module(root) => {
            let nested = NodeScope::new(root.qualified_package_name.clone());
            TopLevelNode::Module(lowering.lower_document_root(root, &nested))
        }
    }
}

/// Scope of the members of `declaration`.
pub fn class_like_scope(declaration: &ClassLikeNode, scope: &NodeScope) -> NodeScope {
    let (kind, generated) = match declaration {
        ClassLikeNode::Interface(interface) => (OwnerKind::Interface, interface.generated),
        ClassLikeNode::Class(_) | ClassLikeNode::Enum(_) => (OwnerKind::Class, false),
    };
    scope
        .with_owner(OwnerContext {
            uid: declaration.uid().clone(),
            name: declaration.name().clone(),
            kind,
            type_parameters: declaration
                .type_parameters()
                .iter()
                .map(|parameter| parameter.name.clone())
                .collect(),
            generated,
        })
        .with_type_parameters(declaration.type_parameters())
}

pub fn walk_class_like<L: NodeLowering + ?Sized>(
    lowering: &mut L,
    declaration: ClassLikeNode,
    scope: &NodeScope,
) -> ClassLikeNode {
    let scope = class_like_scope(&declaration, scope);
    match declaration {
        ClassLikeNode::Class(mut class) => {
            class.type_parameters = lower_type_parameters(lowering, class.type_parameters, &scope);
            class.parent_entities = lower_heritages(lowering, class.parent_entities, &scope);
            class.members = lowering.lower_members(class.members, &scope);
            class.primary_constructor = class
                .primary_constructor
                .map(|constructor| walk_constructor(lowering, constructor, &scope));
            ClassLikeNode::Class(class)
        }
        ClassLikeNode::Interface(mut interface) => {
            interface.type_parameters = lower_type_parameters(lowering, interface.type_parameters, &scope);
            interface.parent_entities = lower_heritages(lowering, interface.parent_entities, &scope);
            interface.members = lowering.lower_members(interface.members, &scope);
            ClassLikeNode::Interface(interface)
        }
        declaration @ ClassLikeNode::Enum(_) => declaration,
    }
}

pub fn walk_members<L: NodeLowering + ?Sized>(
    lowering: &mut L,
    members: Vec<MemberNode>,
    scope: &NodeScope,
) -> Vec<MemberNode> {
    members
        .into_iter()
        .map(|member| lowering.lower_member(member, scope))
        .collect()
}

pub fn walk_member<L: NodeLowering + ?Sized>(lowering: &mut L, member: MemberNode, scope: &NodeScope) -> MemberNode {
    match member {
        MemberNode::Method(mut method) => {
            let scope = scope.with_type_parameters(&method.type_parameters);
            method.type_parameters = lower_type_parameters(lowering, method.type_parameters, &scope);
            method.parameters = lower_parameters(lowering, method.parameters, &scope);
            method.return_type = lowering.lower_type(method.return_type, &scope);
            MemberNode::Method(method)
        }
        MemberNode::Property(mut property) => {
            let scope = scope.with_type_parameters(&property.type_parameters);
            property.type_ = lowering.lower_type(property.type_, &scope);
            MemberNode::Property(property)
        }
        MemberNode::Constructor(constructor) => MemberNode::Constructor(walk_constructor(lowering, constructor, scope)),
    }
}

fn walk_constructor<L: NodeLowering + ?Sized>(
    lowering: &mut L,
    mut constructor: ConstructorNode,
    scope: &NodeScope,
) -> ConstructorNode {
    let scope = scope.with_type_parameters(&constructor.type_parameters);
    constructor.type_parameters = lower_type_parameters(lowering, constructor.type_parameters, &scope);
    constructor.parameters = lower_parameters(lowering, constructor.parameters, &scope);
    constructor
}

pub fn walk_heritage<L: NodeLowering + ?Sized>(lowering: &mut L, heritage: HeritageNode, scope: &NodeScope) -> HeritageNode {
    HeritageNode {
        type_arguments: lower_types(lowering, heritage.type_arguments, scope),
        ..heritage
    }
}

pub fn walk_parameter<L: NodeLowering + ?Sized>(
    lowering: &mut L,
    parameter: ParameterNode,
    scope: &NodeScope,
) -> ParameterNode {
    ParameterNode {
        type_: lowering.lower_type(parameter.type_, scope),
        ..parameter
    }
}

pub fn walk_type<L: NodeLowering + ?Sized>(lowering: &mut L, ty: TypeNode, scope: &NodeScope) -> TypeNode {
    match ty {
        TypeNode::Value(mut node) => {
            node.params = lower_types(lowering, node.params, scope);
            node.meta = node.meta.map(|meta| walk_meta(lowering, meta, scope));
            TypeNode::Value(node)
        }
        TypeNode::Function(mut node) => {
            node.parameters = lower_parameters(lowering, node.parameters, scope);
            node.return_type = Box::new(lowering.lower_type(*node.return_type, scope));
            node.meta = node.meta.map(|meta| walk_meta(lowering, meta, scope));
            TypeNode::Function(node)
        }
        TypeNode::Union(mut node) => {
            node.params = lower_types(lowering, node.params, scope);
            TypeNode::Union(node)
        }
        TypeNode::Tuple(mut node) => {
            node.params = lower_types(lowering, node.params, scope);
            TypeNode::Tuple(node)
        }
        TypeNode::Intersection(mut node) => {
            node.params = lower_types(lowering, node.params, scope);
            TypeNode::Intersection(node)
        }
        TypeNode::GeneratedInterface(mut node) => {
            node.type_arguments = lower_types(lowering, node.type_arguments, scope);
            TypeNode::GeneratedInterface(node)
        }
        TypeNode::TypeParameter(mut node) => {
            node.meta = node.meta.map(|meta| walk_meta(lowering, meta, scope));
            TypeNode::TypeParameter(node)
        }
        ty @ TypeNode::This(_) => ty,
    }
}

fn walk_meta<L: NodeLowering + ?Sized>(lowering: &mut L, meta: TypeMeta, scope: &NodeScope) -> TypeMeta {
    match meta {
        TypeMeta::Intersection(types) => TypeMeta::Intersection(lower_types(lowering, types, scope)),
        TypeMeta::Constraint(types) => TypeMeta::Constraint(lower_types(lowering, types, scope)),
        meta => meta,
    }
}

fn lower_types<L: NodeLowering + ?Sized>(lowering: &mut L, types: Vec<TypeNode>, scope: &NodeScope) -> Vec<TypeNode> {
    types.into_iter().map(|ty| lowering.lower_type(ty, scope)).collect()
}

fn lower_parameters<L: NodeLowering + ?Sized>(
    lowering: &mut L,
    parameters: Vec<ParameterNode>,
    scope: &NodeScope,
) -> Vec<ParameterNode> {
    parameters
        .into_iter()
        .map(|parameter| lowering.lower_parameter(parameter, scope))
        .collect()
}

fn lower_heritages<L: NodeLowering + ?Sized>(
    lowering: &mut L,
    heritages: Vec<HeritageNode>,
    scope: &NodeScope,
) -> Vec<HeritageNode> {
    heritages
        .into_iter()
        .map(|heritage| lowering.lower_heritage(heritage, scope))
        .collect()
}

fn lower_type_parameters<L: NodeLowering + ?Sized>(
    lowering: &mut L,
    parameters: Vec<TypeParameterDefinitionNode>,
    scope: &NodeScope,
) -> Vec<TypeParameterDefinitionNode> {
    parameters
        .into_iter()
        .map(|parameter| TypeParameterDefinitionNode {
            constraints: lower_types(lowering, parameter.constraints, scope),
            ..parameter
        })
        .collect()
}
