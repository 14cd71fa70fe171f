//! Type sublanguage of the Node Model.
//!
//! Every variant carries its own nullability flag; there is no separate
//! "nullable wrapper" node. Two variants only exist between node
//! introduction and the end of the type canonicalizer:
//!
//! | Variant | Lowered by |
//! |---------|------------|
//! | `Intersection` | `lower_intersection_type` |
//! | `This` | `lower_this_type` |
//!
//! The erased type is a `Value` named `dynamic`, optionally carrying a
//! human-readable description in its metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use tsb_common::{NameEntity, Uid};

/// Name of the erased type.
pub const DYNAMIC: &str = "dynamic";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceOrigin {
    /// Declared in the source set being lowered.
    #[default]
    Local,
    /// Declared in the shared library source set.
    Library,
}

/// Resolved identity of a named type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceNode {
    pub uid: Uid,
    #[serde(default)]
    pub origin: ReferenceOrigin,
}

impl ReferenceNode {
    pub fn new(uid: Uid) -> Self {
        let origin = if uid.is_library() {
            ReferenceOrigin::Library
        } else {
            ReferenceOrigin::Local
        };
        Self { uid, origin }
    }
}

/// Side information a type carries into the target model, where it is
/// rendered as a comment next to the target type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeMeta {
    StringLiteral(String),
    NumericLiteral(String),
    BooleanLiteral(bool),
    /// The full member list of a lowered intersection.
    Intersection(Vec<TypeNode>),
    /// `this` used inside a generated interface.
    ThisType,
    /// Constraints of the referenced type parameter.
    Constraint(Vec<TypeNode>),
    /// Free-form description of an erased type.
    Description(String),
    /// Suppresses the `= null` marker on nullable function-type parameters.
    Mute,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeNode {
    Value(TypeValueNode),
    Function(FunctionTypeNode),
    Union(UnionTypeNode),
    Tuple(TupleTypeNode),
    TypeParameter(TypeParameterNode),
    GeneratedInterface(GeneratedInterfaceReferenceNode),
    Intersection(IntersectionTypeNode),
    This(ThisTypeNode),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeValueNode {
    pub value: NameEntity,
    #[serde(default)]
    pub params: Vec<TypeNode>,
    #[serde(default)]
    pub reference: Option<ReferenceNode>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub meta: Option<TypeMeta>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionTypeNode {
    pub parameters: Vec<ParameterNode>,
    pub return_type: Box<TypeNode>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub meta: Option<TypeMeta>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionTypeNode {
    pub params: Vec<TypeNode>,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleTypeNode {
    pub params: Vec<TypeNode>,
    #[serde(default)]
    pub nullable: bool,
}

/// Reference to an enclosing generic parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameterNode {
    pub name: NameEntity,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub meta: Option<TypeMeta>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedInterfaceReferenceNode {
    pub name: NameEntity,
    #[serde(default)]
    pub type_arguments: Vec<TypeNode>,
    #[serde(default)]
    pub reference: Option<ReferenceNode>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub meta: Option<TypeMeta>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectionTypeNode {
    pub params: Vec<TypeNode>,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThisTypeNode {
    #[serde(default)]
    pub nullable: bool,
}

/// Constructor parameter that also declares a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldPromotion {
    Mutable,
    Readonly,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterNode {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: TypeNode,
    /// Source text of the default value, never evaluated.
    #[serde(default)]
    pub initializer: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub vararg: bool,
    #[serde(default)]
    pub field: Option<FieldPromotion>,
}

impl ParameterNode {
    pub fn new(name: impl Into<String>, type_: TypeNode) -> Self {
        Self {
            name: name.into(),
            type_,
            initializer: None,
            optional: false,
            vararg: false,
            field: None,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

// =============================================================================
// Helpers
// =============================================================================

impl TypeNode {
    /// Unresolved, non-nullable named type.
    pub fn value(value: impl Into<NameEntity>) -> Self {
        Self::generic(value, Vec::new())
    }

    pub fn generic(value: impl Into<NameEntity>, params: Vec<TypeNode>) -> Self {
        Self::Value(TypeValueNode {
            value: value.into(),
            params,
            reference: None,
            nullable: false,
            meta: None,
        })
    }

    /// The erased type.
    pub fn dynamic(description: Option<String>) -> Self {
        Self::Value(TypeValueNode {
            value: NameEntity::identifier(DYNAMIC),
            params: Vec::new(),
            reference: None,
            nullable: false,
            meta: description.map(TypeMeta::Description),
        })
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            Self::Value(value)
                if value.reference.is_none() && !value.value.is_qualified() && value.value.rightmost() == DYNAMIC
        )
    }

    /// Unresolved, unqualified `null` or `undefined`.
    pub fn is_null_like(&self) -> bool {
        match self {
            Self::Value(value) => {
                value.reference.is_none()
                    && value.params.is_empty()
                    && !value.value.is_qualified()
                    && matches!(value.value.rightmost(), "null" | "undefined")
            }
            _ => false,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Value(node) => node.nullable,
            Self::Function(node) => node.nullable,
            Self::Union(node) => node.nullable,
            Self::Tuple(node) => node.nullable,
            Self::TypeParameter(node) => node.nullable,
            Self::GeneratedInterface(node) => node.nullable,
            Self::Intersection(node) => node.nullable,
            Self::This(node) => node.nullable,
        }
    }

    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        match &mut self {
            Self::Value(node) => node.nullable = nullable,
            Self::Function(node) => node.nullable = nullable,
            Self::Union(node) => node.nullable = nullable,
            Self::Tuple(node) => node.nullable = nullable,
            Self::TypeParameter(node) => node.nullable = nullable,
            Self::GeneratedInterface(node) => node.nullable = nullable,
            Self::Intersection(node) => node.nullable = nullable,
            Self::This(node) => node.nullable = nullable,
        }
        self
    }

    #[must_use]
    pub fn make_nullable(self) -> Self {
        self.with_nullable(true)
    }

    pub fn meta(&self) -> Option<&TypeMeta> {
        match self {
            Self::Value(node) => node.meta.as_ref(),
            Self::Function(node) => node.meta.as_ref(),
            Self::TypeParameter(node) => node.meta.as_ref(),
            Self::GeneratedInterface(node) => node.meta.as_ref(),
            Self::Union(_) | Self::Tuple(_) | Self::Intersection(_) | Self::This(_) => None,
        }
    }

    /// Attach `meta`. Variants without a metadata slot are returned as-is.
    #[must_use]
    pub fn with_meta(mut self, meta: TypeMeta) -> Self {
        match &mut self {
            Self::Value(node) => node.meta = Some(meta),
            Self::Function(node) => node.meta = Some(meta),
            Self::TypeParameter(node) => node.meta = Some(meta),
            Self::GeneratedInterface(node) => node.meta = Some(meta),
            Self::Union(_) | Self::Tuple(_) | Self::Intersection(_) | Self::This(_) => {}
        }
        self
    }

    pub fn value_name(&self) -> Option<&NameEntity> {
        match self {
            Self::Value(node) => Some(&node.value),
            _ => None,
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_arguments(f: &mut fmt::Formatter<'_>, arguments: &[TypeNode]) -> fmt::Result {
    if !arguments.is_empty() {
        f.write_str("<")?;
        write_list(f, arguments, ", ")?;
        f.write_str(">")?;
    }
    Ok(())
}

fn write_grouped(
    f: &mut fmt::Formatter<'_>,
    nullable: bool,
    body: impl FnOnce(&mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    if nullable {
        f.write_str("(")?;
        body(f)?;
        f.write_str(")?")
    } else {
        body(f)
    }
}

/// Source-like rendering without metadata. Two types that render equally
/// are the same signature type.
impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(node) => {
                write!(f, "{}", node.value)?;
                write_arguments(f, &node.params)?;
                if node.nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
            Self::GeneratedInterface(node) => {
                write!(f, "{}", node.name)?;
                write_arguments(f, &node.type_arguments)?;
                if node.nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
            Self::TypeParameter(node) => {
                write!(f, "{}", node.name)?;
                if node.nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
            Self::Function(node) => write_grouped(f, node.nullable, |f| {
                f.write_str("(")?;
                write_list(f, &node.parameters, ", ")?;
                write!(f, ") -> {}", node.return_type)
            }),
            Self::Union(node) => write_grouped(f, node.nullable, |f| write_list(f, &node.params, " | ")),
            Self::Intersection(node) => write_grouped(f, node.nullable, |f| write_list(f, &node.params, " & ")),
            Self::Tuple(node) => {
                f.write_str("[")?;
                write_list(f, &node.params, ", ")?;
                f.write_str("]")?;
                if node.nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
            Self::This(node) => f.write_str(if node.nullable { "this?" } else { "this" }),
        }
    }
}

impl fmt::Display for ParameterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.vararg {
            f.write_str("vararg ")?;
        }
        write!(f, "{}: {}", self.name, self.type_)
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
