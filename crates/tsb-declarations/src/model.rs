//! Declaration Model: raw declarations as the front-end hands them over.
//!
//! The model is purely structural. Names are textual, heritage clauses
//! name their parents by text only and no declaration carries an identity
//! yet; uids are assigned later when the node model is introduced.
//!
//! # Shape
//!
//! ```text
//! SourceBundleDeclaration
//! └── SourceSetDeclaration (one per library / package)
//!     └── SourceFileDeclaration (one per .d.ts file)
//!         └── ModuleDeclaration (file root, namespaces, external modules)
//!             └── TopLevelDeclaration*
//! ```
//!
//! Library declarations arrive in exactly the same shape with their modules
//! flagged `Origin::Library`.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tsb_common::NameEntity;

// =============================================================================
// Flags and markers
// =============================================================================

bitflags! {
    /// Source modifiers attached to a declaration, member or parameter.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ModifierFlags: u32 {
        const STATIC = 1 << 0;
        const READONLY = 1 << 1;
        const EXPORT = 1 << 2;
        const DECLARE = 1 << 3;
        const DEFAULT = 1 << 4;
        const PUBLIC = 1 << 5;
        const PRIVATE = 1 << 6;
        const PROTECTED = 1 << 7;
        const ABSTRACT = 1 << 8;
    }
}

impl ModifierFlags {
    /// Constructor parameter modifiers that declare a field.
    pub const FIELD: Self = Self::PUBLIC
        .union(Self::PROTECTED)
        .union(Self::PRIVATE)
        .union(Self::READONLY);
}

/// Where a declaration came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    #[default]
    Source,
    /// Ambient standard-library declaration, addressed under `<LIBROOT>`.
    Library,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// Root module of a file.
    #[default]
    File,
    /// `namespace N { }` / `module N { }`
    Namespace,
    /// `declare module "name" { }`
    ExternalModule,
}

/// Literal shape of an initializer. Initializers are never evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralShape {
    String,
    Numeric,
    Boolean,
    Null,
    Identifier,
    #[default]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expression {
    pub text: String,
    #[serde(default)]
    pub shape: LiteralShape,
}

impl Expression {
    pub fn new(text: impl Into<String>, shape: LiteralShape) -> Self {
        Self {
            text: text.into(),
            shape,
        }
    }
}

// =============================================================================
// Containers
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceBundleDeclaration {
    pub sources: Vec<SourceSetDeclaration>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSetDeclaration {
    pub source_name: Vec<String>,
    pub sources: Vec<SourceFileDeclaration>,
}

impl SourceSetDeclaration {
    pub fn new(source_name: impl Into<String>, sources: Vec<SourceFileDeclaration>) -> Self {
        Self {
            source_name: vec![source_name.into()],
            sources,
        }
    }

    /// True when every file of the set is library-origin.
    pub fn is_library(&self) -> bool {
        !self.sources.is_empty()
            && self
                .sources
                .iter()
                .all(|file| file.root.origin == Origin::Library)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFileDeclaration {
    pub file_name: String,
    pub root: ModuleDeclaration,
    #[serde(default)]
    pub referenced_files: Vec<String>,
}

impl SourceFileDeclaration {
    pub fn new(file_name: impl Into<String>, root: ModuleDeclaration) -> Self {
        Self {
            file_name: file_name.into(),
            root,
            referenced_files: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub name: NameEntity,
    #[serde(default)]
    pub kind: ModuleKind,
    pub declarations: Vec<TopLevelDeclaration>,
    #[serde(default)]
    pub modifiers: ModifierFlags,
    #[serde(default)]
    pub origin: Origin,
}

impl ModuleDeclaration {
    /// Root module of a source file.
    pub fn root(declarations: Vec<TopLevelDeclaration>) -> Self {
        Self {
            name: NameEntity::root(),
            kind: ModuleKind::File,
            declarations,
            modifiers: ModifierFlags::empty(),
            origin: Origin::Source,
        }
    }

    /// Root module of a library file.
    pub fn library(declarations: Vec<TopLevelDeclaration>) -> Self {
        Self {
            name: NameEntity::library_root(),
            origin: Origin::Library,
            ..Self::root(declarations)
        }
    }

    pub fn namespace(name: impl Into<NameEntity>, declarations: Vec<TopLevelDeclaration>) -> Self {
        Self {
            name: name.into(),
            kind: ModuleKind::Namespace,
            ..Self::root(declarations)
        }
    }

    pub fn external(name: impl Into<String>, declarations: Vec<TopLevelDeclaration>) -> Self {
        Self {
            name: NameEntity::identifier(name),
            kind: ModuleKind::ExternalModule,
            ..Self::root(declarations)
        }
    }
}

// =============================================================================
// Top-level declarations
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TopLevelDeclaration {
    Variable(VariableDeclaration),
    Function(FunctionDeclaration),
    Class(ClassDeclaration),
    Interface(InterfaceDeclaration),
    Enum(EnumDeclaration),
    TypeAlias(TypeAliasDeclaration),
    Module(ModuleDeclaration),
    /// Anything that is not a declaration (expression statements, imports
    /// the front-end could not classify).
    Statement(StatementDeclaration),
}

impl TopLevelDeclaration {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Variable(_) => "variable",
            Self::Function(_) => "function",
            Self::Class(_) => "class",
            Self::Interface(_) => "interface",
            Self::Enum(_) => "enum",
            Self::TypeAlias(_) => "type alias",
            Self::Module(_) => "module",
            Self::Statement(_) => "statement",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: TypeDeclaration,
    #[serde(default)]
    pub modifiers: ModifierFlags,
    #[serde(default)]
    pub initializer: Option<Expression>,
}

impl VariableDeclaration {
    pub fn new(name: impl Into<String>, type_: TypeDeclaration) -> Self {
        Self {
            name: name.into(),
            type_,
            modifiers: ModifierFlags::DECLARE,
            initializer: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    pub name: String,
    pub parameters: Vec<ParameterDeclaration>,
    pub return_type: TypeDeclaration,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDeclaration>,
    #[serde(default)]
    pub modifiers: ModifierFlags,
}

impl FunctionDeclaration {
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterDeclaration>, return_type: TypeDeclaration) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            type_parameters: Vec::new(),
            modifiers: ModifierFlags::DECLARE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageClauseDeclaration {
    pub name: NameEntity,
    #[serde(default)]
    pub type_arguments: Vec<TypeDeclaration>,
    /// `extends` rather than `implements`.
    #[serde(default)]
    pub extending: bool,
}

impl HeritageClauseDeclaration {
    pub fn new(name: impl Into<NameEntity>) -> Self {
        Self {
            name: name.into(),
            type_arguments: Vec::new(),
            extending: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    pub name: NameEntity,
    pub members: Vec<MemberDeclaration>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDeclaration>,
    #[serde(default)]
    pub parent_entities: Vec<HeritageClauseDeclaration>,
    #[serde(default)]
    pub modifiers: ModifierFlags,
}

impl ClassDeclaration {
    pub fn new(name: impl Into<NameEntity>, members: Vec<MemberDeclaration>) -> Self {
        Self {
            name: name.into(),
            members,
            type_parameters: Vec::new(),
            parent_entities: Vec::new(),
            modifiers: ModifierFlags::DECLARE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDeclaration {
    pub name: NameEntity,
    pub members: Vec<MemberDeclaration>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDeclaration>,
    #[serde(default)]
    pub parent_entities: Vec<HeritageClauseDeclaration>,
    #[serde(default)]
    pub modifiers: ModifierFlags,
    /// Synthesized by a lowering rather than written in source.
    #[serde(default)]
    pub generated: bool,
}

impl InterfaceDeclaration {
    pub fn new(name: impl Into<NameEntity>, members: Vec<MemberDeclaration>) -> Self {
        Self {
            name: name.into(),
            members,
            type_parameters: Vec::new(),
            parent_entities: Vec::new(),
            modifiers: ModifierFlags::empty(),
            generated: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumTokenDeclaration {
    pub value: String,
    #[serde(default)]
    pub initializer: Option<Expression>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumDeclaration {
    pub name: String,
    pub values: Vec<EnumTokenDeclaration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAliasDeclaration {
    pub name: NameEntity,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDeclaration>,
    pub type_reference: TypeDeclaration,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatementDeclaration {
    pub text: String,
}

// =============================================================================
// Members
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MemberDeclaration {
    Property(PropertyDeclaration),
    /// Method declarations and method signatures.
    Method(MethodDeclaration),
    CallSignature(CallSignatureDeclaration),
    IndexSignature(IndexSignatureDeclaration),
    Constructor(ConstructorDeclaration),
    /// `new (...): T` inside an interface.
    ConstructSignature(CallSignatureDeclaration),
}

impl MemberDeclaration {
    /// Declared name, for members that have one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Property(property) => Some(&property.name),
            Self::Method(method) => Some(&method.name),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> ModifierFlags {
        match self {
            Self::Property(property) => property.modifiers,
            Self::Method(method) => method.modifiers,
            Self::IndexSignature(signature) => signature.modifiers,
            Self::Constructor(constructor) => constructor.modifiers,
            Self::CallSignature(_) | Self::ConstructSignature(_) => ModifierFlags::empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: TypeDeclaration,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDeclaration>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub modifiers: ModifierFlags,
    #[serde(default)]
    pub initializer: Option<Expression>,
}

impl PropertyDeclaration {
    pub fn new(name: impl Into<String>, type_: TypeDeclaration) -> Self {
        Self {
            name: name.into(),
            type_,
            type_parameters: Vec::new(),
            optional: false,
            modifiers: ModifierFlags::empty(),
            initializer: None,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierFlags) -> Self {
        self.modifiers |= modifiers;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDeclaration {
    pub name: String,
    pub parameters: Vec<ParameterDeclaration>,
    pub return_type: TypeDeclaration,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDeclaration>,
    /// `foo?(): void` method signature.
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub modifiers: ModifierFlags,
}

impl MethodDeclaration {
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterDeclaration>, return_type: TypeDeclaration) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            type_parameters: Vec::new(),
            optional: false,
            modifiers: ModifierFlags::empty(),
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierFlags) -> Self {
        self.modifiers |= modifiers;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSignatureDeclaration {
    pub parameters: Vec<ParameterDeclaration>,
    pub return_type: TypeDeclaration,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDeclaration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSignatureDeclaration {
    /// Key parameters, usually exactly one.
    pub parameters: Vec<ParameterDeclaration>,
    pub return_type: TypeDeclaration,
    #[serde(default)]
    pub modifiers: ModifierFlags,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorDeclaration {
    pub parameters: Vec<ParameterDeclaration>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDeclaration>,
    #[serde(default)]
    pub modifiers: ModifierFlags,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: TypeDeclaration,
    #[serde(default)]
    pub initializer: Option<Expression>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub vararg: bool,
    #[serde(default)]
    pub modifiers: ModifierFlags,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, type_: TypeDeclaration) -> Self {
        Self {
            name: name.into(),
            type_,
            initializer: None,
            optional: false,
            vararg: false,
            modifiers: ModifierFlags::empty(),
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn vararg(mut self) -> Self {
        self.vararg = true;
        self
    }

    #[must_use]
    pub fn with_initializer(mut self, initializer: Expression) -> Self {
        self.initializer = Some(initializer);
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierFlags) -> Self {
        self.modifiers |= modifiers;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParameterDeclaration {
    pub name: NameEntity,
    #[serde(default)]
    pub constraints: Vec<TypeDeclaration>,
    #[serde(default)]
    pub default_value: Option<TypeDeclaration>,
}

impl TypeParameterDeclaration {
    pub fn new(name: impl Into<NameEntity>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
            default_value: None,
        }
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: TypeDeclaration) -> Self {
        self.constraints.push(constraint);
        self
    }

    #[must_use]
    pub fn with_default(mut self, default_value: TypeDeclaration) -> Self {
        self.default_value = Some(default_value);
        self
    }
}

// =============================================================================
// Types
// =============================================================================

/// A type written in the source type system's own vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TypeDeclaration {
    /// Named reference with type arguments: `Foo<A, B>`, `string`.
    Reference(TypeReferenceDeclaration),
    Union(Vec<TypeDeclaration>),
    Intersection(Vec<TypeDeclaration>),
    Tuple(Vec<TypeDeclaration>),
    Function(FunctionTypeDeclaration),
    /// `T[]`
    Array(Box<TypeDeclaration>),
    StringLiteral(String),
    NumericLiteral(String),
    BooleanLiteral(bool),
    /// Inline `{ ... }` type.
    ObjectLiteral(ObjectLiteralDeclaration),
    This,
    GeneratedInterfaceReference(GeneratedInterfaceReferenceDeclaration),
    /// Front-end fallback for a type it could not classify.
    Unknown(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeReferenceDeclaration {
    pub value: NameEntity,
    #[serde(default)]
    pub params: Vec<TypeDeclaration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionTypeDeclaration {
    pub parameters: Vec<ParameterDeclaration>,
    pub return_type: Box<TypeDeclaration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectLiteralDeclaration {
    pub members: Vec<MemberDeclaration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedInterfaceReferenceDeclaration {
    pub name: NameEntity,
    #[serde(default)]
    pub type_arguments: Vec<TypeDeclaration>,
}

impl TypeDeclaration {
    /// Unparameterized named reference.
    pub fn reference(value: impl Into<NameEntity>) -> Self {
        Self::Reference(TypeReferenceDeclaration {
            value: value.into(),
            params: Vec::new(),
        })
    }

    pub fn generic(value: impl Into<NameEntity>, params: Vec<TypeDeclaration>) -> Self {
        Self::Reference(TypeReferenceDeclaration {
            value: value.into(),
            params,
        })
    }

    pub fn function(parameters: Vec<ParameterDeclaration>, return_type: TypeDeclaration) -> Self {
        Self::Function(FunctionTypeDeclaration {
            parameters,
            return_type: Box::new(return_type),
        })
    }

    pub fn object_literal(members: Vec<MemberDeclaration>) -> Self {
        Self::ObjectLiteral(ObjectLiteralDeclaration { members })
    }

    /// `null` or `undefined`.
    pub fn is_null_like(&self) -> bool {
        match self {
            Self::Reference(reference) => {
                reference.params.is_empty()
                    && matches!(reference.value.rightmost(), "null" | "undefined")
                    && !reference.value.is_qualified()
            }
            _ => false,
        }
    }

    /// Reference name when this is a named reference.
    pub fn reference_name(&self) -> Option<&NameEntity> {
        match self {
            Self::Reference(reference) => Some(&reference.value),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/model_tests.rs"]
mod tests;
