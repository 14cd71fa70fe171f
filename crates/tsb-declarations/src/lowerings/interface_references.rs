//! Hoisting of inline object literal types into generated interfaces.
//!
//! ```text
//! declare function f<T>(options: { value: T; done?: boolean }): void;
//! ```
//!
//! becomes
//!
//! ```text
//! interface T$0<T> { value: T; done?: boolean }   // generated
//! declare function f<T>(options: T$0<T>): void;
//! ```
//!
//! Two object literal positions are not hoisted: the direct type of a
//! variable (it becomes an object declaration) and the body of a type
//! alias (the alias itself becomes a regular interface).

use super::PendingInterfaces;
use crate::model::{
    GeneratedInterfaceReferenceDeclaration, InterfaceDeclaration, MemberDeclaration, ModifierFlags,
    ModuleDeclaration, ObjectLiteralDeclaration, ParameterDeclaration, SourceSetDeclaration,
    TopLevelDeclaration, TypeAliasDeclaration, TypeDeclaration, TypeParameterDeclaration,
};
use crate::visitor::{DeclarationLowering, DeclarationScope, walk_module, walk_top_level, walk_type};
use tracing::debug;
use tsb_common::{DiagnosticBag, NameEntity};

#[derive(Default)]
struct InterfaceReferences {
    pending: PendingInterfaces,
    next_index: u32,
}

impl InterfaceReferences {
    fn hoist(&mut self, literal: ObjectLiteralDeclaration, scope: &DeclarationScope) -> TypeDeclaration {
        if literal.members.is_empty() {
            return TypeDeclaration::reference("object");
        }
        let name = NameEntity::identifier(format!("T${}", self.next_index));
        self.next_index += 1;

        let used: Vec<NameEntity> = scope
            .type_parameters
            .iter()
            .filter(|parameter| literal.members.iter().any(|member| member_mentions(member, parameter)))
            .cloned()
            .collect();
        debug!(module = %scope.module, interface = %name, "hoisting object literal type");

        self.pending.push(
            &scope.module,
            InterfaceDeclaration {
                name: name.clone(),
                members: literal.members,
                type_parameters: used.iter().cloned().map(TypeParameterDeclaration::new).collect(),
                parent_entities: Vec::new(),
                modifiers: ModifierFlags::empty(),
                generated: true,
            },
        );
        TypeDeclaration::GeneratedInterfaceReference(GeneratedInterfaceReferenceDeclaration {
            name,
            type_arguments: used.into_iter().map(TypeDeclaration::reference).collect(),
        })
    }
}

impl DeclarationLowering for InterfaceReferences {
    fn lower_module(&mut self, module: ModuleDeclaration, scope: &DeclarationScope) -> ModuleDeclaration {
        let module = walk_module(self, module, scope);
        self.pending.flush_into(&scope.module, module)
    }

    fn lower_top_level(
        &mut self,
        declaration: TopLevelDeclaration,
        scope: &DeclarationScope,
    ) -> Option<TopLevelDeclaration> {
        let declaration = match declaration {
            TopLevelDeclaration::Variable(mut variable) => {
                variable.type_ = match variable.type_ {
                    TypeDeclaration::ObjectLiteral(literal) => TypeDeclaration::object_literal(
                        literal
                            .members
                            .into_iter()
                            .map(|member| self.lower_member(member, scope))
                            .collect(),
                    ),
                    ty => self.lower_type(ty, scope),
                };
                TopLevelDeclaration::Variable(variable)
            }
            TopLevelDeclaration::TypeAlias(alias) => match alias.type_reference {
                TypeDeclaration::ObjectLiteral(literal) => {
                    debug!(alias = %alias.name, "type alias of an object literal becomes an interface");
                    let interface = InterfaceDeclaration {
                        type_parameters: alias.type_parameters,
                        ..InterfaceDeclaration::new(alias.name, literal.members)
                    };
                    walk_top_level(self, TopLevelDeclaration::Interface(interface), scope)
                }
                type_reference => walk_top_level(
                    self,
                    TopLevelDeclaration::TypeAlias(TypeAliasDeclaration {
                        type_reference,
                        ..alias
                    }),
                    scope,
                ),
            },
            declaration => walk_top_level(self, declaration, scope),
        };
        Some(declaration)
    }

    fn lower_type(&mut self, ty: TypeDeclaration, scope: &DeclarationScope) -> TypeDeclaration {
        match walk_type(self, ty, scope) {
            TypeDeclaration::ObjectLiteral(literal) => self.hoist(literal, scope),
            ty => ty,
        }
    }
}

fn member_mentions(member: &MemberDeclaration, name: &NameEntity) -> bool {
    match member {
        MemberDeclaration::Property(property) => type_mentions(&property.type_, name),
        MemberDeclaration::Method(method) => {
            parameters_mention(&method.parameters, name) || type_mentions(&method.return_type, name)
        }
        MemberDeclaration::CallSignature(signature) | MemberDeclaration::ConstructSignature(signature) => {
            parameters_mention(&signature.parameters, name) || type_mentions(&signature.return_type, name)
        }
        MemberDeclaration::IndexSignature(signature) => {
            parameters_mention(&signature.parameters, name) || type_mentions(&signature.return_type, name)
        }
        MemberDeclaration::Constructor(constructor) => parameters_mention(&constructor.parameters, name),
    }
}

fn parameters_mention(parameters: &[ParameterDeclaration], name: &NameEntity) -> bool {
    parameters.iter().any(|parameter| type_mentions(&parameter.type_, name))
}

fn type_mentions(ty: &TypeDeclaration, name: &NameEntity) -> bool {
    match ty {
        TypeDeclaration::Reference(reference) => {
            &reference.value == name || reference.params.iter().any(|param| type_mentions(param, name))
        }
        TypeDeclaration::Union(members) | TypeDeclaration::Intersection(members) | TypeDeclaration::Tuple(members) => {
            members.iter().any(|member| type_mentions(member, name))
        }
        TypeDeclaration::Function(function) => {
            parameters_mention(&function.parameters, name) || type_mentions(&function.return_type, name)
        }
        TypeDeclaration::Array(element) => type_mentions(element, name),
        TypeDeclaration::ObjectLiteral(literal) => literal.members.iter().any(|member| member_mentions(member, name)),
        TypeDeclaration::GeneratedInterfaceReference(reference) => {
            reference.type_arguments.iter().any(|argument| type_mentions(argument, name))
        }
        TypeDeclaration::StringLiteral(_)
        | TypeDeclaration::NumericLiteral(_)
        | TypeDeclaration::BooleanLiteral(_)
        | TypeDeclaration::This
        | TypeDeclaration::Unknown(_) => false,
    }
}

/// Hoist object literal types into generated interfaces placed in the
/// enclosing module.
pub fn generate_interface_references(
    source_set: SourceSetDeclaration,
    _diagnostics: &mut DiagnosticBag,
) -> SourceSetDeclaration {
    InterfaceReferences::default().lower_source_set(source_set)
}

#[cfg(test)]
#[path = "../../tests/interface_references_tests.rs"]
mod tests;
