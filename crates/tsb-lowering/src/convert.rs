//! Target Model Converter.
//!
//! One recursive conversion `DocumentRootNode -> ModuleModel`, threaded
//! with a `ReferenceResolver` over the library and the converted set. Every
//! reference is resolved to its final target name here; a reference the
//! resolver cannot place is reported and erased.
//!
//! | Node | Model |
//! |------|-------|
//! | union of `String` members | `String` with the literals as metadata |
//! | other union | `dynamic` with `A \| B` metadata |
//! | tuple | `dynamic` with `JsTuple<A, B>` metadata |
//! | static member | member of the companion object |
//! | inline function | body forwarding to `this.asDynamic()` |
//! | `declare module "m"` root | `file:JsModule("m")`, `file:JsNonModule` |
//! | namespace root | `file:JsQualifier` |

use std::iter;
use tracing::{debug, trace};
use tsb_common::diagnostics::{format_message, messages};
use tsb_common::limits::MAX_METADATA_MEMBERS;
use tsb_common::{DiagnosticBag, DiagnosticKind, NameEntity, stdlib};
use tsb_model::{
    AnnotationModel, ClassLikeReferenceModel, ClassModel, ConstructorModel, EnumModel, EnumTokenModel,
    FunctionModel, FunctionTypeModel, HeritageModel, InterfaceModel, MemberModel, MethodModel, ModuleModel,
    ObjectModel, ParameterModel, PropertyModel, SourceFileModel, SourceSetModel, StatementModel, TopLevelModel,
    TypeAliasModel, TypeModel, TypeParameterModel, TypeParameterReferenceModel, TypeValueModel, VariableModel,
};
use tsb_nodes::resolver::ResolvedNode;
use tsb_nodes::{
    AnnotationNode, ClassLikeNode, ClassLikeReferenceNode, ClassNode, ConstructorNode, DocumentRootNode,
    ExportQualifier, FunctionContext, FunctionNode, HeritageNode, InterfaceNode, MemberNode, MethodNode,
    OverloadRole, ParameterNode, ReferenceNode, ReferenceResolver, Resolution, SourceSetNode, TopLevelNode,
    TypeMeta, TypeNode, TypeParameterDefinitionNode, VariableNode,
};

/// Placeholder for an erased constraint; constraints of this name are
/// dropped.
const IMPOSSIBLE_CONSTRAINT: &str = "<IMPOSSIBLE-CONSTRAINT>";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Context {
    TypeConstraint,
    Irrelevant,
    FunctionType,
    InlineExtension,
    Constructor,
}

struct ModelIntroduction<'a> {
    resolver: &'a ReferenceResolver,
    diagnostics: &'a mut DiagnosticBag,
}

fn this_as_dynamic_call(call: StatementModel) -> StatementModel {
    StatementModel::chain(StatementModel::this_as_dynamic(), call)
}

fn is_unit(ty: &TypeNode) -> bool {
    matches!(ty, TypeNode::Value(value) if !value.value.is_qualified() && value.value.rightmost() == "Unit")
}

/// `ty` without its top-level metadata comment.
fn describe(ty: &TypeModel) -> String {
    let mut ty = ty.clone();
    match &mut ty {
        TypeModel::Value(value) => value.metadata = None,
        TypeModel::Function(function) => function.metadata = None,
        TypeModel::TypeParameter(parameter) => parameter.metadata = None,
    }
    ty.to_string()
}

fn join_bounded(parts: Vec<String>, separator: &str) -> String {
    let total = parts.len();
    let mut joined = parts.into_iter().take(MAX_METADATA_MEMBERS).collect::<Vec<_>>().join(separator);
    if total > MAX_METADATA_MEMBERS {
        joined.push_str(separator);
        joined.push_str("...");
    }
    joined
}

fn export_annotations(qualifier: Option<&ExportQualifier>) -> Vec<AnnotationModel> {
    match qualifier {
        Some(ExportQualifier::JsModule(name)) => vec![AnnotationModel::new("JsModule", vec![name.clone()])],
        Some(ExportQualifier::JsDefault) => vec![AnnotationModel::new("JsName", vec!["default".to_string()])],
        None => Vec::new(),
    }
}

fn convert_annotation(annotation: &AnnotationNode) -> AnnotationModel {
    AnnotationModel::new(
        annotation.name.clone(),
        annotation.params.iter().map(ToString::to_string).collect(),
    )
}

impl ModelIntroduction<'_> {
    // =========================================================================
    // Names
    // =========================================================================

    /// Target fq name of `name`. `Err` carries the dangling uid.
    fn fq_name(&self, reference: Option<&ReferenceNode>, name: &NameEntity) -> Result<Option<NameEntity>, String> {
        match self.resolver.resolve(reference, name) {
            Resolution::Qualified(fq_name) => Ok(Some(fq_name)),
            Resolution::Local => Ok(None),
            Resolution::Unresolved(uid) => Err(uid.to_string()),
        }
    }

    fn unresolved(&mut self, name: &NameEntity, uid: &str) -> TypeModel {
        self.diagnostics.raise_concern(
            DiagnosticKind::UnresolvedReference,
            format_message(messages::UNRESOLVED_UID, &[&name.to_string(), uid]),
            TypeModel::dynamic(Some(name.to_string())),
        )
    }

    fn erased_name(context: Context) -> NameEntity {
        match context {
            Context::TypeConstraint => NameEntity::identifier(IMPOSSIBLE_CONSTRAINT),
            _ => NameEntity::identifier(tsb_model::DYNAMIC),
        }
    }

    fn erased(context: Context, metadata: String) -> TypeModel {
        TypeModel::Value(TypeValueModel {
            value: Self::erased_name(context),
            params: Vec::new(),
            metadata: Some(metadata),
            fq_name: None,
            nullable: false,
        })
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn metadata(&mut self, meta: Option<&TypeMeta>, nullable: bool, context: Context) -> Option<String> {
        match meta {
            Some(TypeMeta::ThisType) => Some("this".to_string()),
            Some(TypeMeta::Intersection(types)) => {
                let parts = types
                    .iter()
                    .map(|ty| describe(&self.convert_type(ty.clone(), Context::Irrelevant)))
                    .collect();
                Some(join_bounded(parts, " & "))
            }
            Some(TypeMeta::Description(description)) => Some(description.clone()),
            Some(TypeMeta::Mute) => None,
            _ if context == Context::FunctionType && nullable => Some("= null".to_string()),
            _ => None,
        }
    }

    fn union_member_description(&mut self, member: &TypeNode) -> String {
        match member.meta() {
            Some(TypeMeta::StringLiteral(token)) => format!("\"{token}\""),
            Some(TypeMeta::NumericLiteral(token)) => token.clone(),
            Some(TypeMeta::BooleanLiteral(value)) => value.to_string(),
            _ => describe(&self.convert_type(member.clone(), Context::Irrelevant)),
        }
    }

    fn convert_types(&mut self, types: Vec<TypeNode>, context: Context) -> Vec<TypeModel> {
        types.into_iter().map(|ty| self.convert_type(ty, context)).collect()
    }

    fn convert_type(&mut self, ty: TypeNode, context: Context) -> TypeModel {
        match ty {
            TypeNode::Value(node) => {
                let fq_name = match self.fq_name(node.reference.as_ref(), &node.value) {
                    Ok(fq_name) => fq_name,
                    Err(uid) => return self.unresolved(&node.value, &uid),
                };
                if let Some(TypeMeta::StringLiteral(token)) = &node.meta
                    && node.value.rightmost() == "String"
                {
                    return TypeModel::Value(TypeValueModel {
                        value: node.value,
                        params: Vec::new(),
                        metadata: Some(format!("\"{token}\"")),
                        fq_name,
                        nullable: node.nullable,
                    });
                }
                let metadata = self.metadata(node.meta.as_ref(), node.nullable, context);
                TypeModel::Value(TypeValueModel {
                    value: node.value,
                    params: self.convert_types(node.params, Context::Irrelevant),
                    metadata,
                    fq_name,
                    nullable: node.nullable,
                })
            }
            TypeNode::TypeParameter(node) => TypeModel::TypeParameter(TypeParameterReferenceModel {
                metadata: self.metadata(node.meta.as_ref(), node.nullable, context),
                name: node.name,
                nullable: node.nullable,
            }),
            TypeNode::Function(node) => {
                let metadata = self.metadata(node.meta.as_ref(), node.nullable, context);
                TypeModel::Function(FunctionTypeModel {
                    parameters: node
                        .parameters
                        .into_iter()
                        .map(|parameter| self.convert_parameter(parameter, Context::FunctionType, false))
                        .collect(),
                    type_: Box::new(self.convert_type(*node.return_type, Context::FunctionType)),
                    metadata,
                    nullable: node.nullable,
                })
            }
            TypeNode::Union(node) => {
                let parts = node
                    .params
                    .iter()
                    .map(|member| self.union_member_description(member))
                    .collect();
                let metadata = join_bounded(parts, " | ");
                let all_strings = node
                    .params
                    .iter()
                    .all(|member| matches!(member, TypeNode::Value(value) if value.value.rightmost() == "String" && !value.value.is_qualified()));
                if all_strings && !node.params.is_empty() {
                    let string = NameEntity::identifier("String");
                    TypeModel::Value(TypeValueModel {
                        fq_name: Some(stdlib::library_name(&string)),
                        value: string,
                        params: Vec::new(),
                        metadata: Some(metadata),
                        nullable: node.nullable,
                    })
                } else {
                    Self::erased(context, metadata)
                }
            }
            TypeNode::Tuple(node) => {
                let parts = node
                    .params
                    .into_iter()
                    .map(|member| describe(&self.convert_type(member, Context::Irrelevant)))
                    .collect();
                Self::erased(context, format!("JsTuple<{}>", join_bounded(parts, ", ")))
            }
            TypeNode::GeneratedInterface(node) => {
                let fq_name = match self.fq_name(node.reference.as_ref(), &node.name) {
                    Ok(fq_name) => fq_name,
                    Err(uid) => return self.unresolved(&node.name, &uid),
                };
                let metadata = match node.meta.as_ref() {
                    Some(meta @ (TypeMeta::ThisType | TypeMeta::Intersection(_) | TypeMeta::Description(_))) => {
                        self.metadata(Some(meta), node.nullable, Context::Irrelevant)
                    }
                    _ => None,
                };
                TypeModel::Value(TypeValueModel {
                    value: node.name,
                    params: self.convert_types(node.type_arguments, Context::Irrelevant),
                    metadata,
                    fq_name,
                    nullable: node.nullable,
                })
            }
            ty @ (TypeNode::Intersection(_) | TypeNode::This(_)) => self.diagnostics.raise_concern(
                DiagnosticKind::UnprocessableType,
                format_message(messages::UNPROCESSABLE_TYPE, &[&ty.to_string(), "model conversion"]),
                TypeModel::dynamic(Some(ty.to_string())),
            ),
        }
    }

    fn convert_type_parameters(&mut self, parameters: Vec<TypeParameterDefinitionNode>) -> Vec<TypeParameterModel> {
        parameters
            .into_iter()
            .map(|parameter| TypeParameterModel {
                name: parameter.name,
                constraints: self
                    .convert_types(parameter.constraints, Context::TypeConstraint)
                    .into_iter()
                    .filter(|constraint| {
                        !matches!(constraint, TypeModel::Value(value) if value.value.rightmost() == IMPOSSIBLE_CONSTRAINT)
                    })
                    .collect(),
            })
            .collect()
    }

    fn convert_parameter(&mut self, parameter: ParameterNode, context: Context, truncated: bool) -> ParameterModel {
        let initializer = match context {
            Context::Constructor => None,
            Context::InlineExtension => parameter.optional.then(|| StatementModel::reference("null")),
            _ if truncated => None,
            _ => match (&parameter.initializer, parameter.optional) {
                (Some(text), _) => Some(StatementModel::reference(NameEntity::identifier(text.clone()))),
                (None, true) => Some(StatementModel::reference("definedExternally")),
                (None, false) => None,
            },
        };
        ParameterModel {
            type_: self.convert_type(parameter.type_, context),
            name: parameter.name,
            initializer,
            vararg: parameter.vararg,
        }
    }

    fn convert_parameters(&mut self, parameters: Vec<ParameterNode>, context: Context, truncated: bool) -> Vec<ParameterModel> {
        parameters
            .into_iter()
            .map(|parameter| self.convert_parameter(parameter, context, truncated))
            .collect()
    }

    fn convert_heritage(&mut self, heritage: HeritageNode) -> Option<HeritageModel> {
        let fq_name = match self.fq_name(heritage.reference.as_ref(), &heritage.name) {
            Ok(fq_name) => fq_name,
            Err(uid) => {
                return self.diagnostics.raise_concern(
                    DiagnosticKind::UnresolvedReference,
                    format_message(messages::UNRESOLVED_UID, &[&heritage.name.to_string(), &uid]),
                    None,
                );
            }
        };
        Some(HeritageModel {
            value: TypeValueModel {
                value: heritage.name,
                params: Vec::new(),
                metadata: None,
                fq_name,
                nullable: false,
            },
            type_params: self.convert_types(heritage.type_arguments, Context::Irrelevant),
        })
    }

    fn convert_heritages(&mut self, heritages: Vec<HeritageNode>) -> Vec<HeritageModel> {
        heritages
            .into_iter()
            .filter_map(|heritage| self.convert_heritage(heritage))
            .collect()
    }

    /// Generated methods of interfaces `heritages` refer to, overriding
    /// their interface.
    fn inherited_generated_methods(&mut self, heritages: &[HeritageNode]) -> Vec<MemberModel> {
        let resolver = self.resolver;
        let mut methods = Vec::new();
        for heritage in heritages {
            let Some(entry) = heritage.reference.as_ref().and_then(|reference| resolver.get(&reference.uid)) else {
                continue;
            };
            let ResolvedNode::ClassLike(ClassLikeNode::Interface(interface)) = &entry.node else {
                continue;
            };
            let fq_name = entry.fq_name.clone();
            for member in &interface.members {
                if let MemberNode::Method(method) = member
                    && method.generated
                {
                    trace!(method = %method.name, interface = %fq_name, "copying generated method");
                    methods.push(MemberModel::Method(self.convert_method(method.clone(), Some(fq_name.clone()))));
                }
            }
        }
        methods
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn convert_method(&mut self, method: MethodNode, override_: Option<NameEntity>) -> MethodModel {
        let truncated = method.overload == Some(OverloadRole::Truncated);
        let annotations: Vec<AnnotationModel> = method.annotations.iter().map(convert_annotation).collect();
        MethodModel {
            parameters: self.convert_parameters(method.parameters, Context::Irrelevant, truncated),
            type_: self.convert_type(method.return_type, Context::Irrelevant),
            type_parameters: self.convert_type_parameters(method.type_parameters),
            name: method.name,
            static_: method.static_,
            override_,
            operator: method.operator,
            annotations,
            open: method.open,
        }
    }

    fn convert_constructor(&mut self, constructor: ConstructorNode, context: Context) -> ConstructorModel {
        let truncated = constructor.overload == Some(OverloadRole::Truncated);
        ConstructorModel {
            parameters: self.convert_parameters(constructor.parameters, context, truncated),
            type_parameters: self.convert_type_parameters(constructor.type_parameters),
            generated: constructor.generated,
        }
    }

    fn convert_member(&mut self, member: MemberNode) -> MemberModel {
        match member {
            MemberNode::Constructor(constructor) => {
                MemberModel::Constructor(self.convert_constructor(constructor, Context::Constructor))
            }
            MemberNode::Method(method) => MemberModel::Method(self.convert_method(method, None)),
            MemberNode::Property(property) => MemberModel::Property(PropertyModel {
                immutable: property.is_immutable(),
                type_: self.convert_type(property.type_, Context::Irrelevant),
                type_parameters: self.convert_type_parameters(property.type_parameters),
                name: property.name,
                static_: property.static_,
                override_: None,
                getter: false,
                setter: false,
                open: property.open,
            }),
        }
    }

    /// Instance members, and the companion holding static ones.
    fn split_members(&mut self, members: Vec<MemberNode>) -> (Vec<MemberModel>, Option<ObjectModel>) {
        let (statics, own): (Vec<_>, Vec<_>) = members.into_iter().partition(MemberNode::is_static);
        let own = own.into_iter().map(|member| self.convert_member(member)).collect();
        let companion = (!statics.is_empty()).then(|| {
            ObjectModel::companion(statics.into_iter().map(|member| self.convert_member(member)).collect())
        });
        (own, companion)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn convert_class(&mut self, class: ClassNode) -> ClassModel {
        let (mut members, companion_object) = self.split_members(class.members);
        members.extend(self.inherited_generated_methods(&class.parent_entities));
        ClassModel {
            members,
            companion_object,
            primary_constructor: class
                .primary_constructor
                .map(|constructor| self.convert_constructor(constructor, Context::Irrelevant)),
            type_parameters: self.convert_type_parameters(class.type_parameters),
            parent_entities: self.convert_heritages(class.parent_entities),
            annotations: export_annotations(class.export_qualifier.as_ref()),
            name: class.name,
            external: true,
            abstract_: class.abstract_,
        }
    }

    fn convert_interface(&mut self, interface: InterfaceNode) -> InterfaceModel {
        let (members, companion_object) = self.split_members(interface.members);
        InterfaceModel {
            members,
            companion_object,
            type_parameters: self.convert_type_parameters(interface.type_parameters),
            parent_entities: self.convert_heritages(interface.parent_entities),
            annotations: export_annotations(interface.export_qualifier.as_ref()),
            name: interface.name,
            external: true,
        }
    }

    fn convert_extend(&self, extend: Option<ClassLikeReferenceNode>) -> Option<ClassLikeReferenceModel> {
        extend.map(|extend| ClassLikeReferenceModel {
            name: self.resolver.fq_name(&extend.uid).cloned().unwrap_or(extend.name),
            type_parameters: extend.type_parameters,
        })
    }

    fn function_body(function: &FunctionNode) -> Vec<StatementModel> {
        match &function.context {
            Some(FunctionContext::IndexSignatureGetter { key }) => {
                vec![StatementModel::Return(Box::new(this_as_dynamic_call(StatementModel::call(
                    "get",
                    vec![NameEntity::identifier(key.clone())],
                ))))]
            }
            Some(FunctionContext::IndexSignatureSetter { key }) => vec![this_as_dynamic_call(StatementModel::call(
                "set",
                vec![NameEntity::identifier(key.clone()), NameEntity::identifier("value")],
            ))],
            Some(FunctionContext::CallSignature { arguments }) => {
                let call = this_as_dynamic_call(StatementModel::call(
                    "invoke",
                    arguments.iter().cloned().map(NameEntity::identifier).collect(),
                ));
                if is_unit(&function.return_type) {
                    vec![call]
                } else {
                    vec![StatementModel::Return(Box::new(call))]
                }
            }
            None => Vec::new(),
        }
    }

    fn convert_function(&mut self, function: FunctionNode) -> FunctionModel {
        let body = Self::function_body(&function);
        let context = if function.inline {
            Context::InlineExtension
        } else {
            Context::Irrelevant
        };
        let truncated = function.overload == Some(OverloadRole::Truncated);
        FunctionModel {
            parameters: self.convert_parameters(function.parameters, context, truncated),
            type_: self.convert_type(function.return_type, Context::Irrelevant),
            type_parameters: self.convert_type_parameters(function.type_parameters),
            annotations: export_annotations(function.export_qualifier.as_ref()),
            inline: function.inline,
            operator: function.operator,
            extend: self.convert_extend(function.extend),
            body,
            name: function.name,
        }
    }

    fn convert_variable(&mut self, variable: VariableNode) -> VariableModel {
        let accessors = variable.inline.then(|| {
            let property = this_as_dynamic_call(StatementModel::reference(NameEntity::identifier(
                variable.name.rightmost(),
            )));
            let setter = StatementModel::Assignment {
                left: Box::new(property.clone()),
                right: Box::new(StatementModel::reference("value")),
            };
            (property, setter)
        });
        let (get, set) = accessors.unzip();
        VariableModel {
            type_: self.convert_type(variable.type_, Context::Irrelevant),
            annotations: export_annotations(variable.export_qualifier.as_ref()),
            immutable: variable.immutable,
            inline: variable.inline,
            get,
            set,
            extend: self.convert_extend(variable.extend),
            name: variable.name,
        }
    }

    fn convert_declaration(&mut self, declaration: TopLevelNode) -> Option<TopLevelModel> {
        Some(match declaration {
            TopLevelNode::ClassLike(ClassLikeNode::Class(class)) => TopLevelModel::Class(self.convert_class(class)),
            TopLevelNode::ClassLike(ClassLikeNode::Interface(interface)) => {
                TopLevelModel::Interface(self.convert_interface(interface))
            }
            TopLevelNode::ClassLike(ClassLikeNode::Enum(enumeration)) => TopLevelModel::Enum(EnumModel {
                name: enumeration.name,
                values: enumeration
                    .values
                    .into_iter()
                    .map(|token| EnumTokenModel {
                        value: token.value,
                        meta: token.meta,
                    })
                    .collect(),
            }),
            TopLevelNode::Function(function) => TopLevelModel::Function(self.convert_function(function)),
            TopLevelNode::Variable(variable) => TopLevelModel::Variable(self.convert_variable(variable)),
            TopLevelNode::Object(object) => TopLevelModel::Object(ObjectModel {
                members: object.members.into_iter().map(|member| self.convert_member(member)).collect(),
                parent_entities: self.convert_heritages(object.parent_entities),
                annotations: export_annotations(object.export_qualifier.as_ref()),
                name: object.name,
            }),
            TopLevelNode::TypeAlias(alias) => TopLevelModel::TypeAlias(TypeAliasModel {
                type_reference: self.convert_type(alias.type_reference, Context::Irrelevant),
                type_parameters: alias
                    .type_parameters
                    .into_iter()
                    .map(|parameter| TypeParameterModel {
                        name: parameter.name,
                        constraints: Vec::new(),
                    })
                    .collect(),
                name: alias.name,
            }),
            TopLevelNode::Module(root) => {
                debug!(module = %root.qualified_package_name, "module reached declaration conversion");
                return None;
            }
        })
    }

    fn convert_root(&mut self, root: DocumentRootNode) -> ModuleModel {
        let mut declarations = Vec::new();
        let mut submodules = Vec::new();
        for declaration in root.declarations {
            match declaration {
                TopLevelNode::Module(nested) => submodules.push(self.convert_root(nested)),
                declaration => declarations.extend(self.convert_declaration(declaration)),
            }
        }
        let mut annotations = Vec::new();
        if let Some(js_module) = root.js_module {
            annotations.push(AnnotationModel::new("file:JsModule", vec![js_module]));
            annotations.push(AnnotationModel::new("file:JsNonModule", Vec::new()));
        }
        if let Some(js_qualifier) = root.js_qualifier {
            annotations.push(AnnotationModel::new("file:JsQualifier", vec![js_qualifier]));
        }
        let mut module = ModuleModel::new(root.qualified_package_name, declarations);
        module.annotations = annotations;
        module.submodules = submodules;
        module
    }
}

/// Convert `source_set` into the Target Model. References resolve against
/// `library` and `source_set` itself.
pub fn introduce_models(
    source_set: SourceSetNode,
    library: Option<&SourceSetNode>,
    diagnostics: &mut DiagnosticBag,
) -> SourceSetModel {
    let resolver = ReferenceResolver::collect(library.into_iter().chain(iter::once(&source_set)));
    introduce_models_with(source_set, &resolver, diagnostics)
}

/// Convert `source_set` against a prepared resolver.
pub fn introduce_models_with(
    source_set: SourceSetNode,
    resolver: &ReferenceResolver,
    diagnostics: &mut DiagnosticBag,
) -> SourceSetModel {
    let mut introduction = ModelIntroduction { resolver, diagnostics };
    let sources = source_set
        .sources
        .into_iter()
        .map(|file| SourceFileModel {
            root: introduction.convert_root(file.root),
            file_name: file.file_name,
            referenced_files: file.referenced_files,
        })
        .collect();
    SourceSetModel {
        source_name: source_set.source_name,
        sources,
    }
}

#[cfg(test)]
#[path = "../tests/convert_tests.rs"]
mod tests;
