//! Whole-pipeline translations of small declaration sets.

use std::sync::Arc;
use tsb_common::{DiagnosticBag, DiagnosticKind, Uid, UidGenerator};
use tsb_declarations::{
    ClassDeclaration, FunctionDeclaration, HeritageClauseDeclaration, InterfaceDeclaration, MemberDeclaration, MethodDeclaration,
    ModuleDeclaration, ParameterDeclaration, PropertyDeclaration, SourceBundleDeclaration, SourceFileDeclaration,
    SourceSetDeclaration, TopLevelDeclaration, TypeDeclaration, VariableDeclaration,
};
use tsb_lowering::translator::{declaration_pipeline, node_pipeline};
use tsb_lowering::{Translator, introduce_models};
use tsb_model::{MemberModel, ModuleModel, SourceSetModel, TopLevelModel, TypeModel};
use tsb_nodes::{ReferenceNode, TopLevelNode, TypeNode};

fn reference(name: &str) -> TypeDeclaration {
    TypeDeclaration::reference(name)
}

fn file(name: &str, declarations: Vec<TopLevelDeclaration>) -> SourceFileDeclaration {
    SourceFileDeclaration::new(name, ModuleDeclaration::root(declarations))
}

fn translate(files: Vec<SourceFileDeclaration>) -> (SourceSetModel, DiagnosticBag) {
    let mut diagnostics = DiagnosticBag::new();
    let mut uids = UidGenerator::new("set1");
    let model = Translator::default().lower_source_set(SourceSetDeclaration::new("app", files), &mut uids, &mut diagnostics);
    (model, diagnostics)
}

fn find<'a>(module: &'a ModuleModel, name: &str) -> &'a TopLevelModel {
    module
        .declarations
        .iter()
        .find(|declaration| declaration.name().to_string() == name)
        .unwrap_or_else(|| panic!("no declaration {name}"))
}

fn member_names(members: &[MemberModel]) -> Vec<&str> {
    members.iter().filter_map(MemberModel::name).collect()
}

#[test]
fn test_optional_interface_property() {
    let (model, diagnostics) = translate(vec![file(
        "foo.d.ts",
        vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new(
            "Foo",
            vec![MemberDeclaration::Property(PropertyDeclaration::new("bar", reference("string")).optional())],
        ))],
    )]);
    assert!(diagnostics.is_empty());
    let TopLevelModel::Interface(foo) = find(&model.sources[0].root, "Foo") else {
        panic!("expected interface");
    };
    let MemberModel::Property(bar) = &foo.members[0] else {
        panic!("expected property");
    };
    assert_eq!(bar.type_.to_string(), "String?");
    assert!(!bar.immutable);
    assert!(bar.getter && bar.setter);
}

#[test]
fn test_trailing_optional_parameters_become_overloads() {
    let (model, _) = translate(vec![file(
        "f.d.ts",
        vec![TopLevelDeclaration::Function(FunctionDeclaration::new(
            "f",
            vec![
                ParameterDeclaration::new("a", reference("string")),
                ParameterDeclaration::new("b", reference("number")).optional(),
                ParameterDeclaration::new("c", reference("boolean")).optional(),
            ],
            reference("void"),
        ))],
    )]);
    let arities: Vec<usize> = model.sources[0]
        .root
        .declarations
        .iter()
        .filter_map(|declaration| match declaration {
            TopLevelModel::Function(function) => Some(function.parameters.len()),
            _ => None,
        })
        .collect();
    assert_eq!(arities, [1, 2, 3]);
}

#[test]
fn test_namespaces_merge_across_files() {
    let namespace = |interface: &str| {
        TopLevelDeclaration::Module(ModuleDeclaration::namespace(
            "N",
            vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new(interface, Vec::new()))],
        ))
    };
    let (model, _) = translate(vec![file("a.d.ts", vec![namespace("I")]), file("b.d.ts", vec![namespace("J")])]);
    let merged: Vec<&ModuleModel> = model
        .sources
        .iter()
        .flat_map(|source| &source.root.submodules)
        .collect();
    assert_eq!(merged.len(), 1);
    let names: Vec<String> = merged[0]
        .declarations
        .iter()
        .map(|declaration| declaration.name().to_string())
        .collect();
    assert_eq!(names, ["I", "J"]);
}

#[test]
fn test_class_and_interface_merge_into_class() {
    let (model, _) = translate(vec![
        file(
            "class.d.ts",
            vec![TopLevelDeclaration::Class(ClassDeclaration::new(
                "Widget",
                vec![MemberDeclaration::Property(PropertyDeclaration::new("size", reference("number")))],
            ))],
        ),
        file(
            "augment.d.ts",
            vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new(
                "Widget",
                vec![MemberDeclaration::Method(MethodDeclaration::new("render", Vec::new(), reference("void")))],
            ))],
        ),
    ]);
    let TopLevelModel::Class(widget) = find(&model.sources[0].root, "Widget") else {
        panic!("expected class");
    };
    assert_eq!(member_names(&widget.members), ["size", "render"]);
    assert!(model.sources[1].root.declarations.is_empty());
}

#[test]
fn test_constructor_variable_becomes_companion() {
    let (model, diagnostics) = translate(vec![file(
        "ctor.d.ts",
        vec![
            TopLevelDeclaration::Interface(InterfaceDeclaration::new("Point", Vec::new())),
            TopLevelDeclaration::Interface(InterfaceDeclaration::new(
                "PointConstructor",
                vec![MemberDeclaration::Method(MethodDeclaration::new("origin", Vec::new(), reference("Point")))],
            )),
            TopLevelDeclaration::Variable(VariableDeclaration::new("Point", reference("PointConstructor"))),
        ],
    )]);
    assert!(diagnostics.is_empty());
    let root = &model.sources[0].root;
    assert!(
        !root
            .declarations
            .iter()
            .any(|declaration| matches!(declaration, TopLevelModel::Variable(_)))
    );
    let TopLevelModel::Interface(point) = find(root, "Point") else {
        panic!("expected interface");
    };
    let companion = point.companion_object.as_ref().unwrap();
    assert_eq!(member_names(&companion.members), ["origin"]);
}

#[test]
fn test_redeclared_superclass_method_is_marked_override() {
    let render = || MemberDeclaration::Method(MethodDeclaration::new("render", Vec::new(), reference("void")));
    let mut button = ClassDeclaration::new(
        "Button",
        vec![
            render(),
            MemberDeclaration::Method(MethodDeclaration::new("click", Vec::new(), reference("void"))),
        ],
    );
    button.parent_entities.push(HeritageClauseDeclaration::new("Widget"));
    let (model, diagnostics) = translate(vec![file(
        "widgets.d.ts",
        vec![
            TopLevelDeclaration::Class(ClassDeclaration::new("Widget", vec![render()])),
            TopLevelDeclaration::Class(button),
        ],
    )]);
    assert!(diagnostics.is_empty());
    let TopLevelModel::Class(button) = find(&model.sources[0].root, "Button") else {
        panic!("expected class");
    };
    let overrides: Vec<(&str, Option<String>)> = button
        .members
        .iter()
        .filter_map(|member| match member {
            MemberModel::Method(method) => Some((method.name.as_str(), method.override_.as_ref().map(ToString::to_string))),
            _ => None,
        })
        .collect();
    assert_eq!(overrides, [("render", Some("Widget".to_string())), ("click", None)]);
}

#[test]
fn test_keyword_member_is_escaped() {
    let (model, _) = translate(vec![file(
        "keywords.d.ts",
        vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new(
            "Query",
            vec![MemberDeclaration::Property(PropertyDeclaration::new("in", reference("string")))],
        ))],
    )]);
    let TopLevelModel::Interface(query) = find(&model.sources[0].root, "Query") else {
        panic!("expected interface");
    };
    assert_eq!(member_names(&query.members), ["`in`"]);
}

#[test]
fn test_dangling_uid_is_erased_and_reported() {
    let source_set = SourceSetDeclaration::new(
        "app",
        vec![file(
            "ghost.d.ts",
            vec![TopLevelDeclaration::Variable(VariableDeclaration::new("ghost", reference("Ghost")))],
        )],
    );
    let mut diagnostics = DiagnosticBag::new();
    let mut uids = UidGenerator::new("set1");
    let declarations = declaration_pipeline().run(source_set, &mut diagnostics);
    let mut nodes = node_pipeline(None).run(tsb_nodes::introduce_nodes(declarations, &mut uids, &mut diagnostics), &mut diagnostics);
    if let TopLevelNode::Variable(variable) = &mut nodes.sources[0].root.declarations[0]
        && let TypeNode::Value(value) = &mut variable.type_
    {
        value.reference = Some(ReferenceNode::new(Uid::new("set1-999")));
    }
    let model = introduce_models(nodes, None, &mut diagnostics);
    let TopLevelModel::Variable(ghost) = &model.sources[0].root.declarations[0] else {
        panic!("expected variable");
    };
    assert!(ghost.type_.is_dynamic());
    assert_eq!(diagnostics.count(DiagnosticKind::UnresolvedReference), 1);
}

fn library_set() -> SourceSetDeclaration {
    SourceSetDeclaration::new(
        "lib",
        vec![SourceFileDeclaration::new(
            "lib.d.ts",
            ModuleDeclaration::library(vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new(
                "EventTarget",
                Vec::new(),
            ))]),
        )],
    )
}

fn app_set() -> SourceSetDeclaration {
    SourceSetDeclaration::new(
        "app",
        vec![file(
            "app.d.ts",
            vec![TopLevelDeclaration::Interface(InterfaceDeclaration::new(
                "Button",
                vec![MemberDeclaration::Property(PropertyDeclaration::new("target", reference("EventTarget")))],
            ))],
        )],
    )
}

fn target_fq_name(model: &SourceSetModel) -> Option<String> {
    let TopLevelModel::Interface(button) = find(&model.sources[0].root, "Button") else {
        return None;
    };
    match &button.members[0] {
        MemberModel::Property(property) => match &property.type_ {
            TypeModel::Value(value) => value.fq_name.as_ref().map(ToString::to_string),
            _ => None,
        },
        _ => None,
    }
}

#[test]
fn test_bundle_with_library_set() {
    let translation = Translator::default().lower_bundle(SourceBundleDeclaration {
        sources: vec![library_set(), app_set()],
    });
    assert_eq!(translation.model.sources.len(), 1);
    assert_eq!(target_fq_name(&translation.model.sources[0]).as_deref(), Some("<LIBROOT>.EventTarget"));
    assert!(translation.diagnostics.is_empty());
}

#[test]
fn test_cached_library_resolves_same_names() {
    let mut diagnostics = DiagnosticBag::new();
    let library = Translator::prepare_library(library_set(), &mut diagnostics);
    let cache = Translator::library_to_json(&library, true).unwrap();
    let cached = Translator::library_from_json(&cache).unwrap();

    let direct = Translator::default().lower_bundle(SourceBundleDeclaration {
        sources: vec![library_set(), app_set()],
    });
    let from_cache = Translator::new(Some(Arc::new(cached))).lower_bundle(SourceBundleDeclaration {
        sources: vec![app_set()],
    });
    assert_eq!(direct.model, from_cache.model);
    assert_eq!(target_fq_name(&from_cache.model.sources[0]).as_deref(), Some("<LIBROOT>.EventTarget"));
}
