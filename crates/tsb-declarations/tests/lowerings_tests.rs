use super::*;
use crate::model::{
    ClassDeclaration, HeritageClauseDeclaration, SourceFileDeclaration, SourceSetDeclaration,
    StatementDeclaration, TypeDeclaration, TypeParameterDeclaration, VariableDeclaration,
};
use tsb_common::DiagnosticBag;

fn source_set(declarations: Vec<TopLevelDeclaration>) -> SourceSetDeclaration {
    SourceSetDeclaration::new(
        "main",
        vec![SourceFileDeclaration::new("index.d.ts", ModuleDeclaration::root(declarations))],
    )
}

fn declarations(source_set: SourceSetDeclaration) -> Vec<TopLevelDeclaration> {
    source_set.sources.into_iter().next().map(|file| file.root.declarations).unwrap_or_default()
}

fn variable(name: &str, ty: TypeDeclaration) -> TopLevelDeclaration {
    TopLevelDeclaration::Variable(VariableDeclaration::new(name, ty))
}

fn variable_type(declaration: &TopLevelDeclaration) -> &TypeDeclaration {
    match declaration {
        TopLevelDeclaration::Variable(variable) => &variable.type_,
        other => panic!("expected variable, got {other:?}"),
    }
}

#[test]
fn test_statements_are_filtered_out() {
    let input = source_set(vec![
        TopLevelDeclaration::Statement(StatementDeclaration { text: "foo();".into() }),
        variable("x", TypeDeclaration::reference("number")),
        TopLevelDeclaration::Module(ModuleDeclaration::namespace(
            "inner",
            vec![TopLevelDeclaration::Statement(StatementDeclaration { text: "bar;".into() })],
        )),
    ]);
    let result = declarations(filter_out_non_declarations(input, &mut DiagnosticBag::new()));
    assert_eq!(result.len(), 2);
    let TopLevelDeclaration::Module(inner) = &result[1] else {
        panic!("expected namespace");
    };
    assert!(inner.declarations.is_empty());
}

#[test]
fn test_stdlib_substitution_rewrites_types_and_heritage() {
    let mut class = ClassDeclaration::new("MyError", Vec::new());
    class.parent_entities.push(HeritageClauseDeclaration::new("Error"));
    let input = source_set(vec![
        TopLevelDeclaration::Class(class),
        variable(
            "items",
            TypeDeclaration::generic("ReadonlyArray", vec![TypeDeclaration::reference("string")]),
        ),
    ]);
    let result = declarations(substitute_stdlib_entities(input, &mut DiagnosticBag::new()));
    let TopLevelDeclaration::Class(class) = &result[0] else {
        panic!("expected class");
    };
    assert_eq!(class.parent_entities[0].name.to_string(), "Throwable");
    assert_eq!(
        variable_type(&result[1]),
        &TypeDeclaration::generic("Array", vec![TypeDeclaration::reference("string")])
    );
}

#[test]
fn test_stdlib_substitution_skips_type_parameters() {
    let mut class = ClassDeclaration::new("Box", Vec::new());
    class.type_parameters.push(TypeParameterDeclaration::new("Error"));
    class.members.push(crate::model::MemberDeclaration::Property(crate::model::PropertyDeclaration::new(
        "value",
        TypeDeclaration::reference("Error"),
    )));
    let result = declarations(substitute_stdlib_entities(
        source_set(vec![TopLevelDeclaration::Class(class)]),
        &mut DiagnosticBag::new(),
    ));
    let TopLevelDeclaration::Class(class) = &result[0] else {
        panic!("expected class");
    };
    let crate::model::MemberDeclaration::Property(property) = &class.members[0] else {
        panic!("expected property");
    };
    assert_eq!(property.type_, TypeDeclaration::reference("Error"));
}

#[test]
fn test_default_type_arguments_are_filled_and_dropped() {
    let mut generic = InterfaceDeclaration::new("Box", Vec::new());
    generic.type_parameters = vec![
        TypeParameterDeclaration::new("T"),
        TypeParameterDeclaration::new("U").with_default(TypeDeclaration::reference("string")),
    ];
    let input = source_set(vec![
        TopLevelDeclaration::Interface(generic),
        variable("b", TypeDeclaration::generic("Box", vec![TypeDeclaration::reference("number")])),
    ]);
    let result = declarations(resolve_default_type_params(input, &mut DiagnosticBag::new()));
    let TopLevelDeclaration::Interface(generic) = &result[0] else {
        panic!("expected interface");
    };
    assert!(generic.type_parameters.iter().all(|parameter| parameter.default_value.is_none()));
    assert_eq!(
        variable_type(&result[1]),
        &TypeDeclaration::generic(
            "Box",
            vec![TypeDeclaration::reference("number"), TypeDeclaration::reference("string")]
        )
    );
}

#[test]
fn test_arrays_are_desugared_recursively() {
    let ty = TypeDeclaration::Array(Box::new(TypeDeclaration::Array(Box::new(TypeDeclaration::reference(
        "number",
    )))));
    let result = declarations(desugar_array_declarations(
        source_set(vec![variable("grid", ty)]),
        &mut DiagnosticBag::new(),
    ));
    assert_eq!(
        variable_type(&result[0]),
        &TypeDeclaration::generic(
            "Array",
            vec![TypeDeclaration::generic("Array", vec![TypeDeclaration::reference("number")])]
        )
    );
}

#[test]
fn test_interface_index_merges_and_looks_up_outwards() {
    let first = InterfaceDeclaration::new("Shared", Vec::new());
    let mut second = InterfaceDeclaration::new("Shared", Vec::new());
    second.members.push(crate::model::MemberDeclaration::Property(crate::model::PropertyDeclaration::new(
        "x",
        TypeDeclaration::reference("number"),
    )));
    let input = source_set(vec![
        TopLevelDeclaration::Interface(first),
        TopLevelDeclaration::Interface(second),
        TopLevelDeclaration::Module(ModuleDeclaration::namespace("api", Vec::new())),
    ]);
    let index = InterfaceIndex::collect(&input);
    let scope = DeclarationScope::new(NameEntity::from_dotted("api"));
    let shared = index.lookup(&scope, &NameEntity::identifier("Shared")).expect("visible from api");
    assert_eq!(shared.members.len(), 1);
}
