//! Expansion of the source type system's built-in utility types.
//!
//! | Utility | Result |
//! |---------|--------|
//! | `Readonly<T>`, `Required<T>` | `T` |
//! | `NonNullable<T>` | `T` without `null` / `undefined` union members |
//! | `Record<"a" \| "b", V>` | `{ a: V; b: V }` |
//! | `Record<K, V>` | `{ [key: K]: V }` |
//! | `Partial<I>` | generated interface `PartialI`, every member optional |
//! | `Pick<I, "a">`, `Omit<I, "a">` | generated interface with the selected members |
//!
//! `I` must name an interface of the same source set (or be an object
//! literal). Anything else falls back to the wrapped type.

use super::{InterfaceIndex, PendingInterfaces};
use crate::model::{
    GeneratedInterfaceReferenceDeclaration, IndexSignatureDeclaration, InterfaceDeclaration,
    MemberDeclaration, ModifierFlags, ModuleDeclaration, ObjectLiteralDeclaration, ParameterDeclaration,
    PropertyDeclaration, SourceSetDeclaration, TopLevelDeclaration, TypeDeclaration,
};
use crate::visitor::{DeclarationLowering, DeclarationScope, walk_module, walk_type};
use tracing::debug;
use tsb_common::{DiagnosticBag, NameEntity};

struct UtilityTypes {
    interfaces: InterfaceIndex,
    pending: PendingInterfaces,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Selection {
    Pick,
    Omit,
}

impl UtilityTypes {
    fn expand(&mut self, name: &str, params: Vec<TypeDeclaration>, scope: &DeclarationScope) -> TypeDeclaration {
        let mut args = params.into_iter();
        match (name, args.len()) {
            ("Readonly" | "Required", 1) => args.next().unwrap_or_else(unknown),
            ("NonNullable", 1) => strip_null_like(args.next().unwrap_or_else(unknown)),
            ("Record", 2) => {
                let key = args.next().unwrap_or_else(unknown);
                let value = args.next().unwrap_or_else(unknown);
                record(key, value)
            }
            ("Partial", 1) => self.partial(args.next().unwrap_or_else(unknown), scope),
            ("Pick", 2) | ("Omit", 2) => {
                let target = args.next().unwrap_or_else(unknown);
                let keys = args.next().unwrap_or_else(unknown);
                let selection = if name == "Pick" { Selection::Pick } else { Selection::Omit };
                self.select(target, &keys, selection, scope)
            }
            _ => TypeDeclaration::generic(name, args.collect()),
        }
    }

    fn partial(&mut self, target: TypeDeclaration, scope: &DeclarationScope) -> TypeDeclaration {
        match target {
            TypeDeclaration::ObjectLiteral(literal) => TypeDeclaration::ObjectLiteral(ObjectLiteralDeclaration {
                members: literal.members.into_iter().map(make_optional).collect(),
            }),
            TypeDeclaration::Reference(reference) => {
                let Some(interface) = self.interfaces.lookup(scope, &reference.value).cloned() else {
                    debug!(target = %reference.value, "Partial over a non-local type, keeping the type");
                    return TypeDeclaration::Reference(reference);
                };
                let name = format!("Partial{}", interface.name.rightmost());
                let members = interface.members.iter().cloned().map(make_optional).collect();
                self.generate(scope, name, &interface, members, reference.params)
            }
            other => other,
        }
    }

    fn select(
        &mut self,
        target: TypeDeclaration,
        keys: &TypeDeclaration,
        selection: Selection,
        scope: &DeclarationScope,
    ) -> TypeDeclaration {
        let Some(keys) = string_literal_keys(keys) else {
            debug!("non-literal key set, keeping the selected type");
            return target;
        };
        let keep = |member: &MemberDeclaration| match member.name() {
            Some(name) => keys.iter().any(|key| key == name) == (selection == Selection::Pick),
            None => selection == Selection::Omit,
        };
        match target {
            TypeDeclaration::ObjectLiteral(literal) => TypeDeclaration::ObjectLiteral(ObjectLiteralDeclaration {
                members: literal.members.into_iter().filter(|member| keep(member)).collect(),
            }),
            TypeDeclaration::Reference(reference) => {
                let Some(interface) = self.interfaces.lookup(scope, &reference.value).cloned() else {
                    return TypeDeclaration::Reference(reference);
                };
                let prefix = match selection {
                    Selection::Pick => "Pick",
                    Selection::Omit => "Omit",
                };
                let suffix: String = keys.iter().map(|key| capitalize(key)).collect();
                let name = format!("{prefix}{}{suffix}", interface.name.rightmost());
                let members = interface.members.iter().filter(|&member| keep(member)).cloned().collect();
                self.generate(scope, name, &interface, members, reference.params)
            }
            other => other,
        }
    }

    fn generate(
        &mut self,
        scope: &DeclarationScope,
        name: String,
        source: &InterfaceDeclaration,
        members: Vec<MemberDeclaration>,
        type_arguments: Vec<TypeDeclaration>,
    ) -> TypeDeclaration {
        let name = NameEntity::identifier(name);
        let keeps_parameters = !type_arguments.is_empty() && type_arguments.len() == source.type_parameters.len();
        let interface = InterfaceDeclaration {
            name: name.clone(),
            members,
            type_parameters: if keeps_parameters {
                source.type_parameters.clone()
            } else {
                Vec::new()
            },
            parent_entities: Vec::new(),
            modifiers: ModifierFlags::empty(),
            generated: true,
        };
        if self.pending.push(&scope.module, interface) {
            debug!(module = %scope.module, interface = %name, "generated utility interface");
        }
        TypeDeclaration::GeneratedInterfaceReference(GeneratedInterfaceReferenceDeclaration {
            name,
            type_arguments: if keeps_parameters { type_arguments } else { Vec::new() },
        })
    }
}

impl DeclarationLowering for UtilityTypes {
    fn lower_module(&mut self, module: ModuleDeclaration, scope: &DeclarationScope) -> ModuleDeclaration {
        let mut module = walk_module(self, module, scope);
        // Generated members may themselves use utility types.
        while let Some(interfaces) = self.pending.take(&scope.module) {
            for interface in interfaces {
                if let Some(declaration) = self.lower_top_level(TopLevelDeclaration::Interface(interface), scope) {
                    module.declarations.push(declaration);
                }
            }
        }
        module
    }

    fn lower_type(&mut self, ty: TypeDeclaration, scope: &DeclarationScope) -> TypeDeclaration {
        match walk_type(self, ty, scope) {
            TypeDeclaration::Reference(reference)
                if !reference.value.is_qualified() && !scope.is_type_parameter(&reference.value) =>
            {
                let name = reference.value.rightmost().to_string();
                self.expand(&name, reference.params, scope)
            }
            ty => ty,
        }
    }
}

fn unknown() -> TypeDeclaration {
    TypeDeclaration::Unknown("missing type argument".to_string())
}

fn make_optional(member: MemberDeclaration) -> MemberDeclaration {
    match member {
        MemberDeclaration::Property(property) => MemberDeclaration::Property(property.optional()),
        MemberDeclaration::Method(method) => MemberDeclaration::Method(method.optional()),
        member => member,
    }
}

fn strip_null_like(ty: TypeDeclaration) -> TypeDeclaration {
    match ty {
        TypeDeclaration::Union(members) => {
            let mut remaining: Vec<_> = members.into_iter().filter(|member| !member.is_null_like()).collect();
            if remaining.len() == 1 {
                remaining.remove(0)
            } else {
                TypeDeclaration::Union(remaining)
            }
        }
        ty => ty,
    }
}

fn record(key: TypeDeclaration, value: TypeDeclaration) -> TypeDeclaration {
    let members = match string_literal_keys(&key) {
        Some(keys) => keys
            .into_iter()
            .map(|key| MemberDeclaration::Property(PropertyDeclaration::new(key, value.clone())))
            .collect(),
        None => vec![MemberDeclaration::IndexSignature(IndexSignatureDeclaration {
            parameters: vec![ParameterDeclaration::new("key", key)],
            return_type: value,
            modifiers: ModifierFlags::empty(),
        })],
    };
    TypeDeclaration::object_literal(members)
}

/// `"a"` or `"a" | "b"`.
fn string_literal_keys(ty: &TypeDeclaration) -> Option<Vec<String>> {
    match ty {
        TypeDeclaration::StringLiteral(key) => Some(vec![key.clone()]),
        TypeDeclaration::Union(members) => members
            .iter()
            .map(|member| match member {
                TypeDeclaration::StringLiteral(key) => Some(key.clone()),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Expand utility types into plain types, object literals or generated
/// interfaces.
pub fn resolve_utility_types(
    source_set: SourceSetDeclaration,
    _diagnostics: &mut DiagnosticBag,
) -> SourceSetDeclaration {
    let mut lowering = UtilityTypes {
        interfaces: InterfaceIndex::collect(&source_set),
        pending: PendingInterfaces::default(),
    };
    lowering.lower_source_set(source_set)
}

#[cfg(test)]
#[path = "../../tests/utility_types_tests.rs"]
mod tests;
