use super::*;
use crate::translator::{declaration_pipeline, node_pipeline};
use tsb_common::{DiagnosticBag, DiagnosticKind, Uid, UidGenerator};
use tsb_declarations::{
    CallSignatureDeclaration, ClassDeclaration, FunctionDeclaration, IndexSignatureDeclaration, InterfaceDeclaration, MemberDeclaration,
    ModifierFlags, ModuleDeclaration, ParameterDeclaration, PropertyDeclaration, SourceFileDeclaration,
    SourceSetDeclaration, TopLevelDeclaration, TypeDeclaration, VariableDeclaration,
};
use tsb_nodes::TypeValueNode;

fn reference(name: &str) -> TypeDeclaration {
    TypeDeclaration::reference(name)
}

fn lowered_nodes(declarations: Vec<TopLevelDeclaration>) -> (SourceSetNode, DiagnosticBag) {
    let source_set = SourceSetDeclaration::new(
        "test",
        vec![SourceFileDeclaration::new("index.d.ts", ModuleDeclaration::root(declarations))],
    );
    let mut uids = UidGenerator::new("src");
    let mut diagnostics = DiagnosticBag::new();
    let source_set = declaration_pipeline().run(source_set, &mut diagnostics);
    let nodes = tsb_nodes::introduce_nodes(source_set, &mut uids, &mut diagnostics);
    let nodes = node_pipeline(None).run(nodes, &mut diagnostics);
    (nodes, diagnostics)
}

fn convert(declarations: Vec<TopLevelDeclaration>) -> (SourceSetModel, DiagnosticBag) {
    let (nodes, mut diagnostics) = lowered_nodes(declarations);
    let models = introduce_models(nodes, None, &mut diagnostics);
    (models, diagnostics)
}

fn root_declarations(models: &SourceSetModel) -> &[TopLevelModel] {
    &models.sources[0].root.declarations
}

fn variable_type(models: &SourceSetModel, name: &str) -> TypeModel {
    root_declarations(models)
        .iter()
        .find_map(|declaration| match declaration {
            TopLevelModel::Variable(variable) if variable.name.to_string() == name => Some(variable.type_.clone()),
            _ => None,
        })
        .unwrap()
}

fn functions(models: &SourceSetModel) -> Vec<&FunctionModel> {
    root_declarations(models)
        .iter()
        .filter_map(|declaration| match declaration {
            TopLevelModel::Function(function) => Some(function),
            _ => None,
        })
        .collect()
}

#[test]
fn test_optional_property_converts_to_mutable_nullable_property() {
    let (models, diagnostics) = convert(vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new(
        "Foo",
        vec![MemberDeclaration::Property(PropertyDeclaration::new("bar", reference("string")).optional())],
    ))]);
    assert!(diagnostics.is_empty());
    let TopLevelModel::Interface(foo) = &root_declarations(&models)[0] else {
        panic!("expected interface");
    };
    let MemberModel::Property(bar) = &foo.members[0] else {
        panic!("expected property");
    };
    assert_eq!(bar.type_.to_string(), "String?");
    assert!(!bar.immutable);
    assert!(!bar.getter);
    assert!(foo.external);
}

#[test]
fn test_string_literal_union_becomes_string() {
    let (models, _) = convert(vec![TopLevelDeclaration::Variable(VariableDeclaration::new(
        "mode",
        TypeDeclaration::Union(vec![
            TypeDeclaration::StringLiteral("on".to_string()),
            TypeDeclaration::StringLiteral("off".to_string()),
        ]),
    ))]);
    let TypeModel::Value(mode) = variable_type(&models, "mode") else {
        panic!("expected value type");
    };
    assert_eq!(mode.value.to_string(), "String");
    assert_eq!(mode.metadata.as_deref(), Some("\"on\" | \"off\""));
    assert_eq!(mode.fq_name.map(|name| name.to_string()).as_deref(), Some("<LIBROOT>.String"));
}

#[test]
fn test_mixed_union_is_erased_with_description() {
    let (models, _) = convert(vec![TopLevelDeclaration::Variable(VariableDeclaration::new(
        "value",
        TypeDeclaration::Union(vec![reference("string"), reference("number")]),
    ))]);
    let ty = variable_type(&models, "value");
    assert!(ty.is_dynamic());
    assert_eq!(ty.metadata(), Some("String | Number"));
}

#[test]
fn test_tuple_is_erased_with_js_tuple_description() {
    let (models, _) = convert(vec![TopLevelDeclaration::Variable(VariableDeclaration::new(
        "pair",
        TypeDeclaration::Tuple(vec![reference("string"), reference("number")]),
    ))]);
    let ty = variable_type(&models, "pair");
    assert!(ty.is_dynamic());
    assert_eq!(ty.metadata(), Some("JsTuple<String, Number>"));
}

#[test]
fn test_static_members_move_to_companion() {
    let (models, _) = convert(vec![TopLevelDeclaration::Class(ClassDeclaration::new(
        "Registry",
        vec![
            MemberDeclaration::Property(PropertyDeclaration::new("size", reference("number"))),
            MemberDeclaration::Property(
                PropertyDeclaration::new("instance", reference("Registry")).with_modifiers(ModifierFlags::STATIC),
            ),
        ],
    ))]);
    let TopLevelModel::Class(registry) = &root_declarations(&models)[0] else {
        panic!("expected class");
    };
    assert_eq!(registry.members.len(), 1);
    let companion = registry.companion_object.as_ref().unwrap();
    assert_eq!(companion.name.to_string(), "Companion");
    assert_eq!(companion.members[0].name(), Some("instance"));
}

#[test]
fn test_truncated_overloads_render_no_initializers() {
    let (models, _) = convert(vec![TopLevelDeclaration::Function(FunctionDeclaration::new(
        "f",
        vec![
            ParameterDeclaration::new("a", reference("string")),
            ParameterDeclaration::new("b", reference("number")).optional(),
        ],
        reference("void"),
    ))]);
    let overloads = functions(&models);
    assert_eq!(overloads.len(), 2);
    assert!(overloads[0].parameters.iter().all(|parameter| parameter.initializer.is_none()));
    let complete = &overloads[1];
    assert_eq!(complete.parameters[1].to_string(), "b: Number? = definedExternally");
}

#[test]
fn test_unresolved_uid_is_erased_with_one_diagnostic() {
    let (mut nodes, mut diagnostics) = lowered_nodes(vec![TopLevelDeclaration::Variable(VariableDeclaration::new(
        "ghost",
        reference("Ghost"),
    ))]);
    let TopLevelNode::Variable(variable) = &mut nodes.sources[0].root.declarations[0] else {
        panic!("expected variable");
    };
    variable.type_ = TypeNode::Value(TypeValueNode {
        value: "Ghost".into(),
        params: Vec::new(),
        reference: Some(ReferenceNode::new(Uid::new("src-999"))),
        nullable: false,
        meta: None,
    });
    let before = diagnostics.count(DiagnosticKind::UnresolvedReference);
    let models = introduce_models(nodes, None, &mut diagnostics);
    assert!(variable_type(&models, "ghost").is_dynamic());
    assert_eq!(diagnostics.count(DiagnosticKind::UnresolvedReference), before + 1);
}

#[test]
fn test_unmapped_library_uid_resolves_under_library_root() {
    let (mut nodes, mut diagnostics) = lowered_nodes(vec![TopLevelDeclaration::Variable(VariableDeclaration::new(
        "format",
        reference("Formatter"),
    ))]);
    let TopLevelNode::Variable(variable) = &mut nodes.sources[0].root.declarations[0] else {
        panic!("expected variable");
    };
    variable.type_ = TypeNode::Value(TypeValueNode {
        value: "Formatter".into(),
        params: Vec::new(),
        reference: Some(ReferenceNode::new(Uid::new("lib-42"))),
        nullable: false,
        meta: None,
    });
    let models = introduce_models(nodes, None, &mut diagnostics);
    let TypeModel::Value(ty) = variable_type(&models, "format") else {
        panic!("expected value type");
    };
    assert_eq!(ty.fq_name.map(|name| name.to_string()).as_deref(), Some("<LIBROOT>.Formatter"));
    assert_eq!(diagnostics.count(DiagnosticKind::UnresolvedReference), 0);
}

#[test]
fn test_local_reference_gets_fully_qualified_name() {
    let (models, _) = convert(vec![TopLevelDeclaration::Module(ModuleDeclaration::namespace(
        "shapes",
        vec![
            TopLevelDeclaration::Interface(InterfaceDeclaration::new("Circle", Vec::new())),
            TopLevelDeclaration::Variable(VariableDeclaration::new("unit", reference("Circle"))),
        ],
    ))]);
    let shapes = &models.sources[0].root.submodules[0];
    assert_eq!(
        shapes.annotations,
        vec![AnnotationModel::new("file:JsQualifier", vec!["shapes".to_string()])]
    );
    let TopLevelModel::Variable(unit) = &shapes.declarations[1] else {
        panic!("expected variable");
    };
    let TypeModel::Value(ty) = &unit.type_ else {
        panic!("expected value type");
    };
    assert_eq!(ty.fq_name.as_ref().map(ToString::to_string).as_deref(), Some("shapes.Circle"));
}

#[test]
fn test_external_module_annotations() {
    let (models, _) = convert(vec![TopLevelDeclaration::Module(ModuleDeclaration::external(
        "widgets",
        vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new("Widget", Vec::new()))],
    ))]);
    let widgets = &models.sources[0].root.submodules[0];
    let names: Vec<&str> = widgets.annotations.iter().map(|annotation| annotation.name.as_str()).collect();
    assert_eq!(names, ["file:JsModule", "file:JsNonModule"]);
    assert_eq!(widgets.annotations[0].params, ["widgets"]);
}

#[test]
fn test_index_signature_extensions_forward_to_dynamic() {
    let (models, _) = convert(vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new(
        "Dict",
        vec![MemberDeclaration::IndexSignature(IndexSignatureDeclaration {
            parameters: vec![ParameterDeclaration::new("name", reference("string"))],
            return_type: reference("number"),
            modifiers: ModifierFlags::empty(),
        })],
    ))]);
    let extensions = functions(&models);
    let bodies: Vec<String> = extensions
        .iter()
        .map(|function| function.body.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))
        .collect();
    assert_eq!(
        bodies,
        ["return this.asDynamic().get(name)", "this.asDynamic().set(name, value)"]
    );
    let receiver = extensions[0].extend.as_ref().unwrap();
    assert_eq!(receiver.name.to_string(), "Dict");
    assert!(extensions.iter().all(|function| function.inline));
}

#[test]
fn test_inline_extension_optional_parameter_defaults_to_null() {
    let mut parameter = ParameterNode::new("x", TypeNode::value("String"));
    parameter.optional = true;
    let mut diagnostics = DiagnosticBag::new();
    let resolver = ReferenceResolver::new();
    let mut introduction = ModelIntroduction {
        resolver: &resolver,
        diagnostics: &mut diagnostics,
    };
    let inline = introduction.convert_parameter(parameter.clone(), Context::InlineExtension, false);
    assert_eq!(inline.to_string(), "x: String = null");
    let constructor = introduction.convert_parameter(parameter, Context::Constructor, false);
    assert!(constructor.initializer.is_none());
}

#[test]
fn test_function_type_nullable_parameter_gets_null_marker() {
    let mut diagnostics = DiagnosticBag::new();
    let resolver = ReferenceResolver::new();
    let mut introduction = ModelIntroduction {
        resolver: &resolver,
        diagnostics: &mut diagnostics,
    };
    let ty = introduction.convert_type(TypeNode::value("String").make_nullable(), Context::FunctionType);
    assert_eq!(ty.metadata(), Some("= null"));
    let muted = introduction.convert_type(
        TypeNode::value("String").make_nullable().with_meta(TypeMeta::Mute),
        Context::FunctionType,
    );
    assert_eq!(muted.metadata(), None);
}

#[test]
fn test_intersection_metadata_is_joined() {
    let mut diagnostics = DiagnosticBag::new();
    let resolver = ReferenceResolver::new();
    let mut introduction = ModelIntroduction {
        resolver: &resolver,
        diagnostics: &mut diagnostics,
    };
    let ty = TypeNode::value("A").with_meta(TypeMeta::Intersection(vec![TypeNode::value("A"), TypeNode::value("B")]));
    let converted = introduction.convert_type(ty, Context::Irrelevant);
    assert_eq!(converted.to_string(), "A /* A & B */");
}

#[test]
fn test_class_operator_methods_carry_one_native_annotation() {
    let (models, _) = convert(vec![TopLevelDeclaration::Class(ClassDeclaration::new(
        "Callable",
        vec![
            MemberDeclaration::IndexSignature(IndexSignatureDeclaration {
                parameters: vec![ParameterDeclaration::new("key", reference("string"))],
                return_type: reference("number"),
                modifiers: ModifierFlags::empty(),
            }),
            MemberDeclaration::CallSignature(CallSignatureDeclaration {
                parameters: vec![ParameterDeclaration::new("input", reference("string"))],
                return_type: reference("boolean"),
                type_parameters: Vec::new(),
            }),
        ],
    ))]);
    let TopLevelModel::Class(callable) = &root_declarations(&models)[0] else {
        panic!("expected class");
    };
    let annotations: Vec<(String, Vec<String>)> = callable
        .members
        .iter()
        .filter_map(|member| match member {
            MemberModel::Method(method) => Some((
                method.name.clone(),
                method.annotations.iter().map(|annotation| annotation.name.clone()).collect(),
            )),
            _ => None,
        })
        .collect();
    assert_eq!(
        annotations,
        [
            ("get".to_string(), vec!["nativeGetter".to_string()]),
            ("set".to_string(), vec!["nativeSetter".to_string()]),
            ("invoke".to_string(), vec!["nativeInvoke".to_string()]),
        ]
    );
    assert!(functions(&models).is_empty());
}
