//! Declarations of the Node Model.
//!
//! Members point back at their owner through a plain `Uid`; the owner is
//! looked up through the `ReferenceResolver` when needed and never owned.

use crate::types::{ParameterNode, ReferenceNode, TypeNode};
use serde::{Deserialize, Serialize};
use tsb_common::{NameEntity, Uid};
use tsb_declarations::Origin;

// =============================================================================
// Shared pieces
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationNode {
    pub name: String,
    #[serde(default)]
    pub params: Vec<NameEntity>,
}

impl AnnotationNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }
}

/// Generic parameter declared by a class-like, function, method or alias.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameterDefinitionNode {
    pub name: NameEntity,
    #[serde(default)]
    pub constraints: Vec<TypeNode>,
}

impl TypeParameterDefinitionNode {
    pub fn new(name: impl Into<NameEntity>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageNode {
    pub name: NameEntity,
    #[serde(default)]
    pub type_arguments: Vec<TypeNode>,
    #[serde(default)]
    pub reference: Option<ReferenceNode>,
    #[serde(default)]
    pub extending: bool,
}

/// How a declaration is exported from its module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportQualifier {
    /// Default export of an external module.
    JsModule(String),
    /// `export default` outside an external module.
    JsDefault,
}

/// Role of a member produced by overload synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverloadRole {
    /// The original signature with every optional parameter.
    Complete,
    /// A variant with trailing optional parameters dropped.
    Truncated,
}

// =============================================================================
// Members
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberNode {
    Method(MethodNode),
    Property(PropertyNode),
    Constructor(ConstructorNode),
}

impl MemberNode {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Method(method) => Some(&method.name),
            Self::Property(property) => Some(&property.name),
            Self::Constructor(_) => None,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Self::Method(method) => method.static_,
            Self::Property(property) => property.static_,
            Self::Constructor(_) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodNode {
    pub name: String,
    pub parameters: Vec<ParameterNode>,
    pub return_type: TypeNode,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDefinitionNode>,
    #[serde(default)]
    pub owner: Option<Uid>,
    #[serde(default, rename = "static")]
    pub static_: bool,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub operator: bool,
    #[serde(default)]
    pub annotations: Vec<AnnotationNode>,
    /// Member of a synthesized interface.
    #[serde(default)]
    pub generated: bool,
    #[serde(default)]
    pub overload: Option<OverloadRole>,
}

impl MethodNode {
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterNode>, return_type: TypeNode) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            type_parameters: Vec::new(),
            owner: None,
            static_: false,
            open: false,
            operator: false,
            annotations: Vec::new(),
            generated: false,
            overload: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyNode {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: TypeNode,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDefinitionNode>,
    #[serde(default)]
    pub owner: Option<Uid>,
    #[serde(default, rename = "static")]
    pub static_: bool,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub getter: bool,
    #[serde(default)]
    pub setter: bool,
    #[serde(default)]
    pub optional: bool,
}

impl PropertyNode {
    /// A property that can be read but not written.
    pub fn is_immutable(&self) -> bool {
        self.getter && !self.setter
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorNode {
    pub parameters: Vec<ParameterNode>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDefinitionNode>,
    #[serde(default)]
    pub generated: bool,
    #[serde(default)]
    pub overload: Option<OverloadRole>,
}

impl ConstructorNode {
    pub fn new(parameters: Vec<ParameterNode>) -> Self {
        Self {
            parameters,
            type_parameters: Vec::new(),
            generated: false,
            overload: None,
        }
    }
}

// =============================================================================
// Class-likes
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassLikeNode {
    Class(ClassNode),
    Interface(InterfaceNode),
    Enum(EnumNode),
}

impl ClassLikeNode {
    pub fn uid(&self) -> &Uid {
        match self {
            Self::Class(class) => &class.uid,
            Self::Interface(interface) => &interface.uid,
            Self::Enum(enumeration) => &enumeration.uid,
        }
    }

    pub fn name(&self) -> &NameEntity {
        match self {
            Self::Class(class) => &class.name,
            Self::Interface(interface) => &interface.name,
            Self::Enum(enumeration) => &enumeration.name,
        }
    }

    pub fn members(&self) -> &[MemberNode] {
        match self {
            Self::Class(class) => &class.members,
            Self::Interface(interface) => &interface.members,
            Self::Enum(_) => &[],
        }
    }

    pub fn type_parameters(&self) -> &[TypeParameterDefinitionNode] {
        match self {
            Self::Class(class) => &class.type_parameters,
            Self::Interface(interface) => &interface.type_parameters,
            Self::Enum(_) => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassNode {
    pub uid: Uid,
    pub name: NameEntity,
    pub members: Vec<MemberNode>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDefinitionNode>,
    #[serde(default)]
    pub parent_entities: Vec<HeritageNode>,
    #[serde(default)]
    pub primary_constructor: Option<ConstructorNode>,
    #[serde(default)]
    pub export_qualifier: Option<ExportQualifier>,
    #[serde(default, rename = "abstract")]
    pub abstract_: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceNode {
    pub uid: Uid,
    pub name: NameEntity,
    pub members: Vec<MemberNode>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDefinitionNode>,
    #[serde(default)]
    pub parent_entities: Vec<HeritageNode>,
    #[serde(default)]
    pub export_qualifier: Option<ExportQualifier>,
    #[serde(default)]
    pub generated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTokenNode {
    pub value: String,
    /// Initializer source text.
    #[serde(default)]
    pub meta: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumNode {
    pub uid: Uid,
    pub name: NameEntity,
    pub values: Vec<EnumTokenNode>,
}

// =============================================================================
// Other top-level declarations
// =============================================================================

/// `declare var x: { ... }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectNode {
    pub name: NameEntity,
    pub members: Vec<MemberNode>,
    #[serde(default)]
    pub parent_entities: Vec<HeritageNode>,
    #[serde(default)]
    pub export_qualifier: Option<ExportQualifier>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAliasNode {
    pub uid: Uid,
    pub name: NameEntity,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDefinitionNode>,
    pub type_reference: TypeNode,
}

/// Receiver of an extension function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLikeReferenceNode {
    pub uid: Uid,
    pub name: NameEntity,
    #[serde(default)]
    pub type_parameters: Vec<NameEntity>,
}

/// Member a synthesized inline function stands in for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionContext {
    IndexSignatureGetter { key: String },
    IndexSignatureSetter { key: String },
    CallSignature { arguments: Vec<String> },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionNode {
    pub name: NameEntity,
    pub parameters: Vec<ParameterNode>,
    pub return_type: TypeNode,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDefinitionNode>,
    #[serde(default)]
    pub export_qualifier: Option<ExportQualifier>,
    #[serde(default)]
    pub inline: bool,
    #[serde(default)]
    pub operator: bool,
    #[serde(default)]
    pub extend: Option<ClassLikeReferenceNode>,
    #[serde(default)]
    pub context: Option<FunctionContext>,
    #[serde(default)]
    pub overload: Option<OverloadRole>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableNode {
    pub name: NameEntity,
    #[serde(rename = "type")]
    pub type_: TypeNode,
    #[serde(default)]
    pub export_qualifier: Option<ExportQualifier>,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub inline: bool,
    #[serde(default)]
    pub extend: Option<ClassLikeReferenceNode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopLevelNode {
    ClassLike(ClassLikeNode),
    Object(ObjectNode),
    TypeAlias(TypeAliasNode),
    Function(FunctionNode),
    Variable(VariableNode),
    Module(DocumentRootNode),
}

impl TopLevelNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::ClassLike(ClassLikeNode::Class(_)) => "class",
            Self::ClassLike(ClassLikeNode::Interface(_)) => "interface",
            Self::ClassLike(ClassLikeNode::Enum(_)) => "enum",
            Self::Object(_) => "object",
            Self::TypeAlias(_) => "type alias",
            Self::Function(_) => "function",
            Self::Variable(_) => "variable",
            Self::Module(_) => "module",
        }
    }
}

// =============================================================================
// Containers
// =============================================================================

/// A module-like container: a file root, a namespace or an external module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRootNode {
    pub uid: Uid,
    pub package_name: NameEntity,
    pub qualified_package_name: NameEntity,
    pub declarations: Vec<TopLevelNode>,
    /// Module name for `declare module "name"`.
    #[serde(default)]
    pub js_module: Option<String>,
    /// Qualifier for declarations living in a namespace.
    #[serde(default)]
    pub js_qualifier: Option<String>,
    #[serde(default)]
    pub origin: Origin,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFileNode {
    pub file_name: String,
    pub root: DocumentRootNode,
    #[serde(default)]
    pub referenced_files: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSetNode {
    pub source_name: Vec<String>,
    pub sources: Vec<SourceFileNode>,
}
