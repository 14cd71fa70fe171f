use super::*;
use crate::model::{FunctionDeclaration, PropertyDeclaration, SourceFileDeclaration, VariableDeclaration};

fn lowered(declarations: Vec<TopLevelDeclaration>) -> Vec<TopLevelDeclaration> {
    let source_set = SourceSetDeclaration::new(
        "main",
        vec![SourceFileDeclaration::new("index.d.ts", ModuleDeclaration::root(declarations))],
    );
    let mut diagnostics = DiagnosticBag::new();
    let mut result = generate_interface_references(source_set, &mut diagnostics);
    result.sources.remove(0).root.declarations
}

fn value_literal(type_name: &str) -> TypeDeclaration {
    TypeDeclaration::object_literal(vec![MemberDeclaration::Property(PropertyDeclaration::new(
        "value",
        TypeDeclaration::reference(type_name),
    ))])
}

#[test]
fn test_parameter_literal_is_hoisted_with_used_type_parameters() {
    let mut function = FunctionDeclaration::new(
        "f",
        vec![ParameterDeclaration::new("options", value_literal("T"))],
        TypeDeclaration::reference("void"),
    );
    function.type_parameters = vec![TypeParameterDeclaration::new("T"), TypeParameterDeclaration::new("U")];
    let declarations = lowered(vec![TopLevelDeclaration::Function(function)]);

    assert_eq!(declarations.len(), 2);
    let TopLevelDeclaration::Function(function) = &declarations[0] else {
        panic!("expected function");
    };
    let TypeDeclaration::GeneratedInterfaceReference(reference) = &function.parameters[0].type_ else {
        panic!("expected generated reference");
    };
    assert_eq!(reference.name.to_string(), "T$0");
    assert_eq!(reference.type_arguments, vec![TypeDeclaration::reference("T")]);

    let TopLevelDeclaration::Interface(interface) = &declarations[1] else {
        panic!("expected generated interface");
    };
    assert!(interface.generated);
    assert_eq!(interface.type_parameters.len(), 1);
}

#[test]
fn test_variable_literal_is_kept_inline() {
    let declarations = lowered(vec![TopLevelDeclaration::Variable(VariableDeclaration::new(
        "config",
        value_literal("string"),
    ))]);
    assert_eq!(declarations.len(), 1);
    assert!(matches!(
        &declarations[0],
        TopLevelDeclaration::Variable(variable) if matches!(variable.type_, TypeDeclaration::ObjectLiteral(_))
    ));
}

#[test]
fn test_nested_literal_inside_variable_literal_is_hoisted() {
    let outer = TypeDeclaration::object_literal(vec![MemberDeclaration::Property(PropertyDeclaration::new(
        "inner",
        value_literal("number"),
    ))]);
    let declarations = lowered(vec![TopLevelDeclaration::Variable(VariableDeclaration::new("config", outer))]);
    assert_eq!(declarations.len(), 2);
    assert!(matches!(&declarations[1], TopLevelDeclaration::Interface(i) if i.name.to_string() == "T$0"));
}

#[test]
fn test_alias_of_literal_becomes_interface() {
    let alias = TypeAliasDeclaration {
        name: NameEntity::identifier("Point"),
        type_parameters: Vec::new(),
        type_reference: value_literal("number"),
    };
    let declarations = lowered(vec![TopLevelDeclaration::TypeAlias(alias)]);
    assert!(matches!(
        &declarations[..],
        [TopLevelDeclaration::Interface(interface)] if interface.name.to_string() == "Point" && !interface.generated
    ));
}

#[test]
fn test_empty_literal_becomes_object_reference() {
    let function = FunctionDeclaration::new(
        "f",
        vec![ParameterDeclaration::new("o", TypeDeclaration::object_literal(Vec::new()))],
        TypeDeclaration::reference("void"),
    );
    let declarations = lowered(vec![TopLevelDeclaration::Function(function)]);
    assert_eq!(declarations.len(), 1);
    let TopLevelDeclaration::Function(function) = &declarations[0] else {
        panic!("expected function");
    };
    assert_eq!(function.parameters[0].type_, TypeDeclaration::reference("object"));
}

#[test]
fn test_literal_in_namespace_is_hosted_by_namespace() {
    let function = FunctionDeclaration::new(
        "f",
        vec![ParameterDeclaration::new("o", value_literal("string"))],
        TypeDeclaration::reference("void"),
    );
    let namespace = ModuleDeclaration::namespace("api", vec![TopLevelDeclaration::Function(function)]);
    let declarations = lowered(vec![TopLevelDeclaration::Module(namespace)]);
    assert_eq!(declarations.len(), 1);
    let TopLevelDeclaration::Module(namespace) = &declarations[0] else {
        panic!("expected namespace");
    };
    assert_eq!(namespace.declarations.len(), 2);
}
