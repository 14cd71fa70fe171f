//! Target Model: what the printer consumes.
//!
//! Every type is fully resolved. `fq_name` on a value type is the name the
//! printer imports or qualifies with; `None` means the name is used as
//! written (type parameters, erased types, local names).

use serde::{Deserialize, Serialize};
use tsb_common::NameEntity;

/// Name of the erased type.
pub const DYNAMIC: &str = "dynamic";

// =============================================================================
// Containers
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBundleModel {
    pub sources: Vec<SourceSetModel>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSetModel {
    pub source_name: Vec<String>,
    pub sources: Vec<SourceFileModel>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFileModel {
    pub file_name: String,
    pub root: ModuleModel,
    #[serde(default)]
    pub referenced_files: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleModel {
    /// Fully-qualified package name.
    pub name: NameEntity,
    pub short_name: String,
    pub declarations: Vec<TopLevelModel>,
    #[serde(default)]
    pub annotations: Vec<AnnotationModel>,
    #[serde(default)]
    pub submodules: Vec<ModuleModel>,
    #[serde(default)]
    pub imports: Vec<ImportModel>,
}

impl ModuleModel {
    pub fn new(name: NameEntity, declarations: Vec<TopLevelModel>) -> Self {
        Self {
            short_name: name.rightmost().to_string(),
            name,
            declarations,
            annotations: Vec::new(),
            submodules: Vec::new(),
            imports: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportModel {
    pub name: NameEntity,
    #[serde(default)]
    pub alias: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationModel {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
}

impl AnnotationModel {
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

// =============================================================================
// Top-level declarations
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopLevelModel {
    Class(ClassModel),
    Interface(InterfaceModel),
    Enum(EnumModel),
    Function(FunctionModel),
    Variable(VariableModel),
    Object(ObjectModel),
    TypeAlias(TypeAliasModel),
}

impl TopLevelModel {
    pub fn name(&self) -> &NameEntity {
        match self {
            Self::Class(class) => &class.name,
            Self::Interface(interface) => &interface.name,
            Self::Enum(enumeration) => &enumeration.name,
            Self::Function(function) => &function.name,
            Self::Variable(variable) => &variable.name,
            Self::Object(object) => &object.name,
            Self::TypeAlias(alias) => &alias.name,
        }
    }

    pub fn is_class_like(&self) -> bool {
        matches!(self, Self::Class(_) | Self::Interface(_) | Self::Enum(_) | Self::Object(_))
    }

    /// Members of a declaration that can host nested declarations.
    pub fn members_mut(&mut self) -> Option<&mut Vec<MemberModel>> {
        match self {
            Self::Class(class) => Some(&mut class.members),
            Self::Interface(interface) => Some(&mut interface.members),
            Self::Object(object) => Some(&mut object.members),
            Self::Enum(_) | Self::Function(_) | Self::Variable(_) | Self::TypeAlias(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Interface(_) => "interface",
            Self::Enum(_) => "enum",
            Self::Function(_) => "function",
            Self::Variable(_) => "variable",
            Self::Object(_) => "object",
            Self::TypeAlias(_) => "type alias",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassModel {
    pub name: NameEntity,
    pub members: Vec<MemberModel>,
    #[serde(default)]
    pub companion_object: Option<ObjectModel>,
    #[serde(default)]
    pub primary_constructor: Option<ConstructorModel>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterModel>,
    #[serde(default)]
    pub parent_entities: Vec<HeritageModel>,
    #[serde(default)]
    pub annotations: Vec<AnnotationModel>,
    #[serde(default)]
    pub external: bool,
    #[serde(default, rename = "abstract")]
    pub abstract_: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceModel {
    pub name: NameEntity,
    pub members: Vec<MemberModel>,
    #[serde(default)]
    pub companion_object: Option<ObjectModel>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterModel>,
    #[serde(default)]
    pub parent_entities: Vec<HeritageModel>,
    #[serde(default)]
    pub annotations: Vec<AnnotationModel>,
    #[serde(default)]
    pub external: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTokenModel {
    pub value: String,
    #[serde(default)]
    pub meta: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumModel {
    pub name: NameEntity,
    pub values: Vec<EnumTokenModel>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionModel {
    pub name: NameEntity,
    pub parameters: Vec<ParameterModel>,
    #[serde(rename = "type")]
    pub type_: TypeModel,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterModel>,
    #[serde(default)]
    pub annotations: Vec<AnnotationModel>,
    #[serde(default)]
    pub inline: bool,
    #[serde(default)]
    pub operator: bool,
    #[serde(default)]
    pub extend: Option<ClassLikeReferenceModel>,
    #[serde(default)]
    pub body: Vec<StatementModel>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableModel {
    pub name: NameEntity,
    #[serde(rename = "type")]
    pub type_: TypeModel,
    #[serde(default)]
    pub annotations: Vec<AnnotationModel>,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub inline: bool,
    #[serde(default)]
    pub get: Option<StatementModel>,
    #[serde(default)]
    pub set: Option<StatementModel>,
    #[serde(default)]
    pub extend: Option<ClassLikeReferenceModel>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectModel {
    pub name: NameEntity,
    pub members: Vec<MemberModel>,
    #[serde(default)]
    pub parent_entities: Vec<HeritageModel>,
    #[serde(default)]
    pub annotations: Vec<AnnotationModel>,
}

impl ObjectModel {
    /// Name of a class-like's companion object.
    pub const COMPANION: &'static str = "Companion";

    pub fn companion(members: Vec<MemberModel>) -> Self {
        Self {
            name: NameEntity::identifier(Self::COMPANION),
            members,
            parent_entities: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAliasModel {
    pub name: NameEntity,
    pub type_reference: TypeModel,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterModel>,
}

// =============================================================================
// Members
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberModel {
    Method(MethodModel),
    Property(PropertyModel),
    Constructor(ConstructorModel),
    /// A class-like relocated into its outer declaration.
    Nested(TopLevelModel),
}

impl MemberModel {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Method(method) => Some(method.name.as_str()),
            Self::Property(property) => Some(property.name.as_str()),
            Self::Constructor(_) => None,
            Self::Nested(declaration) => Some(declaration.name().rightmost()),
        }
    }

    /// Identity for last-writer-wins merging: kind, name and parameter
    /// types. Same-arity overloads with distinct parameter types coexist.
    pub fn merge_key(&self) -> String {
        fn signature(parameters: &[ParameterModel]) -> String {
            parameters
                .iter()
                .map(|parameter| parameter.type_.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
        match self {
            Self::Method(method) => format!(
                "{}method {}({})",
                if method.static_ { "static " } else { "" },
                method.name,
                signature(&method.parameters)
            ),
            Self::Property(property) => format!(
                "{}property {}",
                if property.static_ { "static " } else { "" },
                property.name
            ),
            Self::Constructor(constructor) => format!("constructor({})", signature(&constructor.parameters)),
            Self::Nested(declaration) => format!("nested {}", declaration.name().rightmost()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodModel {
    pub name: String,
    pub parameters: Vec<ParameterModel>,
    #[serde(rename = "type")]
    pub type_: TypeModel,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterModel>,
    #[serde(default, rename = "static")]
    pub static_: bool,
    /// Interface this method overrides.
    #[serde(default, rename = "override")]
    pub override_: Option<NameEntity>,
    #[serde(default)]
    pub operator: bool,
    #[serde(default)]
    pub annotations: Vec<AnnotationModel>,
    #[serde(default)]
    pub open: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyModel {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: TypeModel,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterModel>,
    #[serde(default, rename = "static")]
    pub static_: bool,
    #[serde(default, rename = "override")]
    pub override_: Option<NameEntity>,
    #[serde(default)]
    pub immutable: bool,
    /// Render an explicit `get() = definedExternally`.
    #[serde(default)]
    pub getter: bool,
    /// Render an explicit `set(value) = definedExternally`.
    #[serde(default)]
    pub setter: bool,
    #[serde(default)]
    pub open: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorModel {
    pub parameters: Vec<ParameterModel>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterModel>,
    #[serde(default)]
    pub generated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterModel {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: TypeModel,
    #[serde(default)]
    pub initializer: Option<StatementModel>,
    #[serde(default)]
    pub vararg: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameterModel {
    pub name: NameEntity,
    #[serde(default)]
    pub constraints: Vec<TypeModel>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageModel {
    pub value: TypeValueModel,
    #[serde(default)]
    pub type_params: Vec<TypeModel>,
}

/// Receiver of an extension function or property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLikeReferenceModel {
    pub name: NameEntity,
    #[serde(default)]
    pub type_parameters: Vec<NameEntity>,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeModel {
    Value(TypeValueModel),
    Function(FunctionTypeModel),
    TypeParameter(TypeParameterReferenceModel),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeValueModel {
    pub value: NameEntity,
    #[serde(default)]
    pub params: Vec<TypeModel>,
    /// Rendered next to the type as a comment.
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub fq_name: Option<NameEntity>,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTypeModel {
    pub parameters: Vec<ParameterModel>,
    #[serde(rename = "type")]
    pub type_: Box<TypeModel>,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameterReferenceModel {
    pub name: NameEntity,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub nullable: bool,
}

impl TypeModel {
    /// The erased type carrying `metadata`.
    pub fn dynamic(metadata: Option<String>) -> Self {
        Self::Value(TypeValueModel {
            value: NameEntity::identifier(DYNAMIC),
            params: Vec::new(),
            metadata,
            fq_name: None,
            nullable: false,
        })
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Value(value) if !value.value.is_qualified() && value.value.rightmost() == DYNAMIC)
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Value(value) => value.nullable,
            Self::Function(function) => function.nullable,
            Self::TypeParameter(parameter) => parameter.nullable,
        }
    }

    pub fn metadata(&self) -> Option<&str> {
        match self {
            Self::Value(value) => value.metadata.as_deref(),
            Self::Function(function) => function.metadata.as_deref(),
            Self::TypeParameter(parameter) => parameter.metadata.as_deref(),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

/// Bodies of synthesized accessors and default-value markers. Never
/// evaluated; the printer renders them verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementModel {
    /// `value`, `value(arguments)`
    Call(CallModel),
    /// `left.right`
    Chain {
        left: Box<StatementModel>,
        right: Box<StatementModel>,
    },
    Return(Box<StatementModel>),
    /// `left = right`
    Assignment {
        left: Box<StatementModel>,
        right: Box<StatementModel>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallModel {
    pub value: NameEntity,
    /// `None` renders a bare reference without parentheses.
    #[serde(default)]
    pub arguments: Option<Vec<NameEntity>>,
    /// Comment rendered after the statement.
    #[serde(default)]
    pub meta: Option<String>,
}

impl StatementModel {
    pub fn reference(value: impl Into<NameEntity>) -> Self {
        Self::Call(CallModel {
            value: value.into(),
            arguments: None,
            meta: None,
        })
    }

    pub fn call(value: impl Into<NameEntity>, arguments: Vec<NameEntity>) -> Self {
        Self::Call(CallModel {
            value: value.into(),
            arguments: Some(arguments),
            meta: None,
        })
    }

    pub fn chain(left: Self, right: Self) -> Self {
        Self::Chain {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `this.asDynamic()`
    pub fn this_as_dynamic() -> Self {
        Self::call("this.asDynamic", Vec::new())
    }
}
