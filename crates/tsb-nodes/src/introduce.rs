//! Node introduction: Declaration Model to Node Model.
//!
//! One call consumes one declaration source set and produces the matching
//! node source set with the same logical content. Along the way:
//!
//! - every module, class-like, enum and type alias receives a fresh uid,
//!   depth-first in pre-order (a module's uid is issued before the uids of
//!   the declarations it contains);
//! - members are normalized into methods, properties and constructors;
//! - private members are dropped;
//! - `declare var x: { ... }` becomes an object declaration.
//!
//! | Member | Node |
//! |--------|------|
//! | call signature | `invoke` operator method, `@nativeInvoke` |
//! | index signature `[k: K]: V` | `get(k: K): V?` `@nativeGetter` and `set(k: K, value: V): Unit` `@nativeSetter` |
//! | optional method `m?()` | nullable function-typed property, getter only |
//! | optional property `p?: T` | property of type `T?`, getter and setter |
//! | construct signature | not supported, skipped |

use crate::nodes::{
    AnnotationNode, ClassLikeNode, ClassNode, ConstructorNode, DocumentRootNode, EnumNode, EnumTokenNode,
    ExportQualifier, FunctionNode, HeritageNode, InterfaceNode, MemberNode, MethodNode, ObjectNode, PropertyNode,
    SourceFileNode, SourceSetNode, TopLevelNode, TypeAliasNode, TypeParameterDefinitionNode, VariableNode,
};
use crate::types::{
    FieldPromotion, FunctionTypeNode, GeneratedInterfaceReferenceNode, IntersectionTypeNode, ParameterNode,
    ThisTypeNode, TupleTypeNode, TypeMeta, TypeNode, UnionTypeNode,
};
use tracing::{debug, trace};
use tsb_common::diagnostics::{format_message, messages};
use tsb_common::{DiagnosticBag, DiagnosticKind, LIBRARY_ROOT, NameEntity, Uid, UidGenerator};
use tsb_declarations::{
    ClassDeclaration, EnumDeclaration, FunctionDeclaration, HeritageClauseDeclaration, IndexSignatureDeclaration,
    InterfaceDeclaration, MemberDeclaration, MethodDeclaration, ModifierFlags, ModuleDeclaration, ModuleKind, Origin,
    ParameterDeclaration, PropertyDeclaration, SourceFileDeclaration, SourceSetDeclaration, TopLevelDeclaration,
    TypeDeclaration, TypeParameterDeclaration, VariableDeclaration,
};

/// The module whose declarations are being introduced.
struct ModuleContext {
    qualified_name: NameEntity,
    kind: ModuleKind,
    origin: Origin,
}

/// Class-like that owns the members being introduced.
struct MemberOwner<'a> {
    uid: Option<&'a Uid>,
    name: &'a NameEntity,
    interface: bool,
    generated: bool,
}

struct NodeIntroduction<'a> {
    uids: &'a mut UidGenerator,
    diagnostics: &'a mut DiagnosticBag,
}

impl NodeIntroduction<'_> {
    fn introduce_file(&mut self, file: SourceFileDeclaration) -> SourceFileNode {
        debug!(file = %file.file_name, "introducing nodes");
        SourceFileNode {
            file_name: file.file_name,
            root: self.introduce_root(file.root, None),
            referenced_files: file.referenced_files,
        }
    }

    fn introduce_root(&mut self, module: ModuleDeclaration, parent: Option<&ModuleContext>) -> DocumentRootNode {
        let uid = self.uids.next_uid();
        let qualified_name = match parent {
            Some(parent) => NameEntity::qualify(&parent.qualified_name, &module.name),
            None => module.name.clone(),
        };
        let origin = match parent {
            Some(parent) if parent.origin == Origin::Library => Origin::Library,
            _ => module.origin,
        };
        let js_module = (module.kind == ModuleKind::ExternalModule).then(|| module.name.to_string());
        let js_qualifier = (module.kind == ModuleKind::Namespace).then(|| js_qualifier(&qualified_name));

        let context = ModuleContext {
            qualified_name: qualified_name.clone(),
            kind: module.kind,
            origin,
        };
        let declarations = module
            .declarations
            .into_iter()
            .filter_map(|declaration| self.introduce_declaration(declaration, &context))
            .collect();

        DocumentRootNode {
            uid,
            package_name: module.name,
            qualified_package_name: qualified_name,
            declarations,
            js_module,
            js_qualifier,
            origin,
        }
    }

    fn introduce_declaration(
        &mut self,
        declaration: TopLevelDeclaration,
        module: &ModuleContext,
    ) -> Option<TopLevelNode> {
        let node = match declaration {
            TopLevelDeclaration::Variable(variable) => self.introduce_variable(variable, module),
            TopLevelDeclaration::Function(function) => TopLevelNode::Function(self.introduce_function(function, module)),
            TopLevelDeclaration::Class(class) => TopLevelNode::ClassLike(self.introduce_class(class, module)),
            TopLevelDeclaration::Interface(interface) => {
                TopLevelNode::ClassLike(self.introduce_interface(interface, module))
            }
            TopLevelDeclaration::Enum(enumeration) => TopLevelNode::ClassLike(self.introduce_enum(enumeration)),
            TopLevelDeclaration::TypeAlias(alias) => {
                let uid = self.uids.next_uid();
                TopLevelNode::TypeAlias(TypeAliasNode {
                    uid,
                    name: alias.name,
                    type_parameters: self.introduce_type_parameters(alias.type_parameters),
                    type_reference: self.introduce_type(alias.type_reference),
                })
            }
            TopLevelDeclaration::Module(nested) => TopLevelNode::Module(self.introduce_root(nested, Some(module))),
            TopLevelDeclaration::Statement(statement) => {
                let message = format_message(messages::UNSUPPORTED_DECLARATION, &[&format!("statement `{}`", statement.text)]);
                return self.diagnostics.raise_concern(DiagnosticKind::UnsupportedConstruct, message, None);
            }
        };
        trace!(kind = node.kind_name(), module = %module.qualified_name, "introduced declaration");
        Some(node)
    }

    fn introduce_variable(&mut self, variable: VariableDeclaration, module: &ModuleContext) -> TopLevelNode {
        let name = NameEntity::identifier(variable.name);
        let export_qualifier = export_qualifier(variable.modifiers, module);
        match variable.type_ {
            TypeDeclaration::ObjectLiteral(literal) => {
                let owner = MemberOwner {
                    uid: None,
                    name: &name,
                    interface: false,
                    generated: false,
                };
                let members = self.introduce_members(literal.members, &owner);
                TopLevelNode::Object(ObjectNode {
                    name,
                    members,
                    parent_entities: Vec::new(),
                    export_qualifier,
                })
            }
            ty => TopLevelNode::Variable(VariableNode {
                name,
                type_: self.introduce_type(ty),
                export_qualifier,
                immutable: variable.modifiers.contains(ModifierFlags::READONLY),
                inline: false,
                extend: None,
            }),
        }
    }

    fn introduce_function(&mut self, function: FunctionDeclaration, module: &ModuleContext) -> FunctionNode {
        FunctionNode {
            name: NameEntity::identifier(function.name),
            parameters: self.introduce_parameters(function.parameters),
            return_type: self.introduce_type(function.return_type),
            type_parameters: self.introduce_type_parameters(function.type_parameters),
            export_qualifier: export_qualifier(function.modifiers, module),
            inline: false,
            operator: false,
            extend: None,
            context: None,
            overload: None,
        }
    }

    fn introduce_class(&mut self, class: ClassDeclaration, module: &ModuleContext) -> ClassLikeNode {
        let uid = self.uids.next_uid();
        let owner = MemberOwner {
            uid: Some(&uid),
            name: &class.name,
            interface: false,
            generated: false,
        };
        let members = self.introduce_members(class.members, &owner);
        ClassLikeNode::Class(ClassNode {
            members,
            type_parameters: self.introduce_type_parameters(class.type_parameters),
            parent_entities: self.introduce_heritages(class.parent_entities),
            primary_constructor: None,
            export_qualifier: export_qualifier(class.modifiers, module),
            abstract_: class.modifiers.contains(ModifierFlags::ABSTRACT),
            name: class.name,
            uid,
        })
    }

    fn introduce_interface(&mut self, interface: InterfaceDeclaration, module: &ModuleContext) -> ClassLikeNode {
        let uid = if interface.generated {
            self.uids.next_generated()
        } else {
            self.uids.next_uid()
        };
        let owner = MemberOwner {
            uid: Some(&uid),
            name: &interface.name,
            interface: true,
            generated: interface.generated,
        };
        let members = self.introduce_members(interface.members, &owner);
        ClassLikeNode::Interface(InterfaceNode {
            members,
            type_parameters: self.introduce_type_parameters(interface.type_parameters),
            parent_entities: self.introduce_heritages(interface.parent_entities),
            export_qualifier: export_qualifier(interface.modifiers, module),
            generated: interface.generated,
            name: interface.name,
            uid,
        })
    }

    fn introduce_enum(&mut self, enumeration: EnumDeclaration) -> ClassLikeNode {
        ClassLikeNode::Enum(EnumNode {
            uid: self.uids.next_uid(),
            name: NameEntity::identifier(enumeration.name),
            values: enumeration
                .values
                .into_iter()
                .map(|token| EnumTokenNode {
                    value: token.value,
                    meta: token.initializer.map(|initializer| initializer.text),
                })
                .collect(),
        })
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn introduce_members(&mut self, members: Vec<MemberDeclaration>, owner: &MemberOwner<'_>) -> Vec<MemberNode> {
        let mut nodes = Vec::with_capacity(members.len());
        for member in members {
            if member.modifiers().contains(ModifierFlags::PRIVATE) {
                trace!(owner = %owner.name, member = member.name().unwrap_or("<anonymous>"), "dropping private member");
                continue;
            }
            match member {
                MemberDeclaration::Property(property) => nodes.push(self.introduce_property(property, owner)),
                MemberDeclaration::Method(method) => nodes.push(self.introduce_method(method, owner)),
                MemberDeclaration::CallSignature(signature) => {
                    let mut invoke = MethodNode::new(
                        "invoke",
                        self.introduce_parameters(signature.parameters),
                        self.introduce_type(signature.return_type),
                    );
                    invoke.type_parameters = self.introduce_type_parameters(signature.type_parameters);
                    invoke.owner = owner.uid.cloned();
                    invoke.operator = true;
                    invoke.generated = owner.generated;
                    invoke.annotations.push(AnnotationNode::new("nativeInvoke"));
                    nodes.push(MemberNode::Method(invoke));
                }
                MemberDeclaration::IndexSignature(signature) => {
                    let [getter, setter] = self.introduce_index_signature(signature, owner);
                    nodes.push(getter);
                    nodes.push(setter);
                }
                MemberDeclaration::Constructor(constructor) => {
                    let mut node = ConstructorNode::new(self.introduce_parameters(constructor.parameters));
                    node.type_parameters = self.introduce_type_parameters(constructor.type_parameters);
                    nodes.push(MemberNode::Constructor(node));
                }
                MemberDeclaration::ConstructSignature(_) => {
                    let owner_name = owner.name.to_string();
                    let message = format_message(messages::UNSUPPORTED_MEMBER, &["construct signature", &owner_name]);
                    self.diagnostics
                        .raise_concern(DiagnosticKind::UnsupportedConstruct, message, ());
                }
            }
        }
        nodes
    }

    fn introduce_property(&mut self, property: PropertyDeclaration, owner: &MemberOwner<'_>) -> MemberNode {
        let type_ = self.introduce_type(property.type_);
        let static_ = property.modifiers.contains(ModifierFlags::STATIC);
        let readonly = property.modifiers.contains(ModifierFlags::READONLY);
        MemberNode::Property(PropertyNode {
            name: property.name,
            type_: if property.optional { type_.make_nullable() } else { type_ },
            type_parameters: self.introduce_type_parameters(property.type_parameters),
            owner: owner.uid.cloned(),
            static_,
            open: !owner.interface && !static_,
            // Optional readonly properties still get a setter.
            getter: property.optional || readonly,
            setter: property.optional,
            optional: property.optional,
        })
    }

    fn introduce_method(&mut self, method: MethodDeclaration, owner: &MemberOwner<'_>) -> MemberNode {
        let parameters = self.introduce_parameters(method.parameters);
        let return_type = self.introduce_type(method.return_type);
        let type_parameters = self.introduce_type_parameters(method.type_parameters);
        if method.optional {
            return MemberNode::Property(PropertyNode {
                name: method.name,
                type_: TypeNode::Function(FunctionTypeNode {
                    parameters,
                    return_type: Box::new(return_type),
                    nullable: true,
                    meta: None,
                }),
                type_parameters,
                owner: owner.uid.cloned(),
                static_: false,
                open: false,
                getter: true,
                setter: false,
                optional: true,
            });
        }
        let static_ = method.modifiers.contains(ModifierFlags::STATIC);
        let mut node = MethodNode::new(method.name, parameters, return_type);
        node.type_parameters = type_parameters;
        node.owner = owner.uid.cloned();
        node.static_ = static_;
        node.open = !owner.interface && !static_;
        node.generated = owner.generated;
        MemberNode::Method(node)
    }

    fn introduce_index_signature(
        &mut self,
        signature: IndexSignatureDeclaration,
        owner: &MemberOwner<'_>,
    ) -> [MemberNode; 2] {
        let keys = self.introduce_parameters(signature.parameters);
        let value_type = self.introduce_type(signature.return_type);

        let mut getter = MethodNode::new("get", keys.clone(), value_type.clone().make_nullable());
        getter.annotations.push(AnnotationNode::new("nativeGetter"));

        let mut setter_parameters = keys;
        setter_parameters.push(ParameterNode::new("value", value_type));
        let mut setter = MethodNode::new("set", setter_parameters, TypeNode::value("Unit"));
        setter.annotations.push(AnnotationNode::new("nativeSetter"));

        [getter, setter].map(|mut method| {
            method.owner = owner.uid.cloned();
            method.operator = true;
            method.generated = owner.generated;
            MemberNode::Method(method)
        })
    }

    // =========================================================================
    // Parameters and types
    // =========================================================================

    fn introduce_parameters(&mut self, parameters: Vec<ParameterDeclaration>) -> Vec<ParameterNode> {
        parameters
            .into_iter()
            .map(|parameter| self.introduce_parameter(parameter))
            .collect()
    }

    fn introduce_parameter(&mut self, parameter: ParameterDeclaration) -> ParameterNode {
        let optional = parameter.optional || parameter.initializer.is_some();
        let type_ = self.introduce_type(parameter.type_);
        let modifiers = parameter.modifiers;
        let field = if modifiers.contains(ModifierFlags::PRIVATE) {
            None
        } else if modifiers.contains(ModifierFlags::READONLY) {
            Some(FieldPromotion::Readonly)
        } else if modifiers.intersects(ModifierFlags::PUBLIC | ModifierFlags::PROTECTED) {
            Some(FieldPromotion::Mutable)
        } else {
            None
        };
        ParameterNode {
            name: parameter.name,
            type_: if optional && !parameter.vararg { type_.make_nullable() } else { type_ },
            initializer: parameter.initializer.map(|initializer| initializer.text),
            optional,
            vararg: parameter.vararg,
            field,
        }
    }

    fn introduce_type_parameters(&mut self, parameters: Vec<TypeParameterDeclaration>) -> Vec<TypeParameterDefinitionNode> {
        parameters
            .into_iter()
            .map(|parameter| TypeParameterDefinitionNode {
                name: parameter.name,
                constraints: self.introduce_types(parameter.constraints),
            })
            .collect()
    }

    fn introduce_heritages(&mut self, heritages: Vec<HeritageClauseDeclaration>) -> Vec<HeritageNode> {
        heritages
            .into_iter()
            .map(|heritage| HeritageNode {
                name: heritage.name,
                type_arguments: self.introduce_types(heritage.type_arguments),
                reference: None,
                extending: heritage.extending,
            })
            .collect()
    }

    fn introduce_types(&mut self, types: Vec<TypeDeclaration>) -> Vec<TypeNode> {
        types.into_iter().map(|ty| self.introduce_type(ty)).collect()
    }

    fn introduce_type(&mut self, ty: TypeDeclaration) -> TypeNode {
        match ty {
            TypeDeclaration::Reference(reference) => {
                TypeNode::generic(reference.value, self.introduce_types(reference.params))
            }
            TypeDeclaration::Union(members) => TypeNode::Union(UnionTypeNode {
                params: self.introduce_types(members),
                nullable: false,
            }),
            TypeDeclaration::Intersection(members) => TypeNode::Intersection(IntersectionTypeNode {
                params: self.introduce_types(members),
                nullable: false,
            }),
            TypeDeclaration::Tuple(members) => TypeNode::Tuple(TupleTypeNode {
                params: self.introduce_types(members),
                nullable: false,
            }),
            TypeDeclaration::Function(function) => TypeNode::Function(FunctionTypeNode {
                parameters: self.introduce_parameters(function.parameters),
                return_type: Box::new(self.introduce_type(*function.return_type)),
                nullable: false,
                meta: None,
            }),
            TypeDeclaration::Array(element) => TypeNode::generic("Array", vec![self.introduce_type(*element)]),
            TypeDeclaration::StringLiteral(value) => TypeNode::value("string").with_meta(TypeMeta::StringLiteral(value)),
            TypeDeclaration::NumericLiteral(value) => {
                TypeNode::value("number").with_meta(TypeMeta::NumericLiteral(value))
            }
            TypeDeclaration::BooleanLiteral(value) => {
                TypeNode::value("boolean").with_meta(TypeMeta::BooleanLiteral(value))
            }
            TypeDeclaration::This => TypeNode::This(ThisTypeNode::default()),
            TypeDeclaration::GeneratedInterfaceReference(reference) => {
                TypeNode::GeneratedInterface(GeneratedInterfaceReferenceNode {
                    name: reference.name,
                    type_arguments: self.introduce_types(reference.type_arguments),
                    reference: None,
                    nullable: false,
                    meta: None,
                })
            }
            TypeDeclaration::ObjectLiteral(_) => {
                let message = format_message(messages::UNEXPECTED_SHAPE, &["object literal type", "node introduction"]);
                self.diagnostics.raise_concern(
                    DiagnosticKind::StructuralInvariantViolation,
                    message,
                    TypeNode::dynamic(Some("object".to_string())),
                )
            }
            TypeDeclaration::Unknown(description) => {
                let message = format_message(messages::UNPROCESSABLE_TYPE, &[&description, "node introduction"]);
                self.diagnostics.raise_concern(
                    DiagnosticKind::UnprocessableType,
                    message,
                    TypeNode::dynamic(Some(description)),
                )
            }
        }
    }
}

fn export_qualifier(modifiers: ModifierFlags, module: &ModuleContext) -> Option<ExportQualifier> {
    if !modifiers.contains(ModifierFlags::DEFAULT) {
        return None;
    }
    Some(match module.kind {
        ModuleKind::ExternalModule => ExportQualifier::JsModule(module.qualified_name.rightmost().to_string()),
        ModuleKind::File | ModuleKind::Namespace => ExportQualifier::JsDefault,
    })
}

/// Runtime qualifier of a namespace: its qualified name without the
/// library root.
fn js_qualifier(qualified_name: &NameEntity) -> String {
    match qualified_name.shift_left() {
        Some(shifted) if qualified_name.leftmost() == LIBRARY_ROOT => shifted.to_string(),
        _ => qualified_name.to_string(),
    }
}

/// Introduce the Node Model for one source set. Uids are drawn from `uids`,
/// so independent source sets must use generators with distinct namespaces.
pub fn introduce_nodes(
    source_set: SourceSetDeclaration,
    uids: &mut UidGenerator,
    diagnostics: &mut DiagnosticBag,
) -> SourceSetNode {
    let mut introduction = NodeIntroduction { uids, diagnostics };
    let sources = source_set
        .sources
        .into_iter()
        .map(|file| introduction.introduce_file(file))
        .collect();
    debug!(namespace = introduction.uids.namespace(), issued = introduction.uids.issued(), "node introduction done");
    SourceSetNode {
        source_name: source_set.source_name,
        sources,
    }
}

#[cfg(test)]
#[path = "../tests/introduce_tests.rs"]
mod tests;
