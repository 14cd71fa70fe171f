use super::*;
use crate::model::*;
use tsb_common::{DiagnosticBag, NameEntity};

fn value(name: &str) -> TypeModel {
    TypeModel::Value(TypeValueModel {
        value: NameEntity::from(name),
        params: Vec::new(),
        metadata: None,
        fq_name: None,
        nullable: false,
    })
}

fn nullable(name: &str) -> TypeModel {
    match value(name) {
        TypeModel::Value(mut ty) => {
            ty.nullable = true;
            TypeModel::Value(ty)
        }
        ty => ty,
    }
}

fn property(name: &str, ty: TypeModel) -> MemberModel {
    MemberModel::Property(PropertyModel {
        name: name.to_string(),
        type_: ty,
        type_parameters: Vec::new(),
        static_: false,
        override_: None,
        immutable: false,
        getter: false,
        setter: false,
        open: true,
    })
}

fn method(name: &str, parameters: &[(&str, &str)]) -> MemberModel {
    MemberModel::Method(MethodModel {
        name: name.to_string(),
        parameters: parameters
            .iter()
            .map(|(name, ty)| ParameterModel {
                name: name.to_string(),
                type_: value(ty),
                initializer: None,
                vararg: false,
            })
            .collect(),
        type_: value("Unit"),
        type_parameters: Vec::new(),
        static_: false,
        override_: None,
        operator: false,
        annotations: Vec::new(),
        open: true,
    })
}

fn class(name: &str, members: Vec<MemberModel>) -> TopLevelModel {
    TopLevelModel::Class(ClassModel {
        name: NameEntity::from(name),
        members,
        companion_object: None,
        primary_constructor: None,
        type_parameters: Vec::new(),
        parent_entities: Vec::new(),
        annotations: Vec::new(),
        external: true,
        abstract_: false,
    })
}

fn interface(name: &str, members: Vec<MemberModel>) -> TopLevelModel {
    TopLevelModel::Interface(InterfaceModel {
        name: NameEntity::from(name),
        members,
        companion_object: None,
        type_parameters: Vec::new(),
        parent_entities: Vec::new(),
        annotations: Vec::new(),
        external: true,
    })
}

fn variable(name: &str, ty: TypeModel) -> TopLevelModel {
    TopLevelModel::Variable(VariableModel {
        name: NameEntity::from(name),
        type_: ty,
        annotations: Vec::new(),
        immutable: false,
        inline: false,
        get: None,
        set: None,
        extend: None,
    })
}

fn module(name: &str, declarations: Vec<TopLevelModel>, submodules: Vec<ModuleModel>) -> ModuleModel {
    let mut module = ModuleModel::new(NameEntity::from(name), declarations);
    module.submodules = submodules;
    module
}

fn file(name: &str, root: ModuleModel) -> SourceFileModel {
    SourceFileModel {
        file_name: name.to_string(),
        root,
        referenced_files: Vec::new(),
    }
}

fn source_set(files: Vec<SourceFileModel>) -> SourceSetModel {
    SourceSetModel {
        source_name: vec!["test".to_string()],
        sources: files,
    }
}

fn single_root(declarations: Vec<TopLevelModel>) -> SourceSetModel {
    source_set(vec![file("index.d.ts", module("<ROOT>", declarations, Vec::new()))])
}

fn names(declarations: &[TopLevelModel]) -> Vec<String> {
    declarations.iter().map(|declaration| declaration.name().to_string()).collect()
}

fn member_names(members: &[MemberModel]) -> Vec<String> {
    members
        .iter()
        .filter_map(|member| member.name().map(str::to_string))
        .collect()
}

fn run(stage: fn(SourceSetModel, &mut DiagnosticBag) -> SourceSetModel, input: SourceSetModel) -> SourceSetModel {
    let mut diagnostics = DiagnosticBag::new();
    let output = stage(input, &mut diagnostics);
    assert!(diagnostics.is_empty());
    output
}

fn as_class(declaration: &TopLevelModel) -> &ClassModel {
    match declaration {
        TopLevelModel::Class(class) => class,
        other => panic!("expected class, got {}", other.kind_name()),
    }
}

fn as_interface(declaration: &TopLevelModel) -> &InterfaceModel {
    match declaration {
        TopLevelModel::Interface(interface) => interface,
        other => panic!("expected interface, got {}", other.kind_name()),
    }
}

// =============================================================================
// escape_identifiers
// =============================================================================

#[test]
fn test_escape_segment_rules() {
    assert_eq!(escape_segment("value"), "value");
    assert_eq!(escape_segment("object"), "`object`");
    assert_eq!(escape_segment("is"), "`is`");
    assert_eq!(escape_segment("data-id"), "`data-id`");
    assert_eq!(escape_segment("$scope"), "`$scope`");
    assert_eq!(escape_segment("1st"), "`1st`");
    assert_eq!(escape_segment("`done`"), "`done`");
    assert_eq!(escape_segment("<ROOT>"), "<ROOT>");
    assert_eq!(escape_segment("<LIBROOT>"), "<LIBROOT>");
    assert_eq!(escape_segment("dynamic"), "dynamic");
}

#[test]
fn test_escape_name_per_segment() {
    let escaped = escape_name(&NameEntity::from("package.in.Foo"));
    assert_eq!(escaped.to_string(), "`package`.`in`.Foo");
}

#[test]
fn test_escape_identifiers_members_parameters_and_types() {
    let input = single_root(vec![interface(
        "object",
        vec![property("when", value("in")), method("fun", &[("val", "String")])],
    )]);
    let output = run(escape_identifiers, input);
    let interface = as_interface(&output.sources[0].root.declarations[0]);
    assert_eq!(interface.name.to_string(), "`object`");
    assert_eq!(member_names(&interface.members), vec!["`when`", "`fun`"]);
    let MemberModel::Property(when) = &interface.members[0] else {
        panic!("expected property");
    };
    assert_eq!(when.type_.to_string(), "`in`");
    let MemberModel::Method(fun) = &interface.members[1] else {
        panic!("expected method");
    };
    assert_eq!(fun.parameters[0].name, "`val`");
}

#[test]
fn test_escape_identifiers_leaves_statements() {
    let input = single_root(vec![TopLevelModel::Function(FunctionModel {
        name: NameEntity::from("get"),
        parameters: Vec::new(),
        type_: value("String"),
        type_parameters: Vec::new(),
        annotations: Vec::new(),
        inline: true,
        operator: true,
        extend: None,
        body: vec![StatementModel::Return(Box::new(StatementModel::chain(
            StatementModel::this_as_dynamic(),
            StatementModel::call("get", vec![NameEntity::identifier("key")]),
        )))],
    })]);
    let output = run(escape_identifiers, input);
    let TopLevelModel::Function(function) = &output.sources[0].root.declarations[0] else {
        panic!("expected function");
    };
    assert_eq!(function.body[0].to_string(), "return this.asDynamic().get(key)");
}

// =============================================================================
// merge_modules
// =============================================================================

#[test]
fn test_merge_modules_across_files() {
    let input = source_set(vec![
        file(
            "a.d.ts",
            module("<ROOT>", Vec::new(), vec![module("N", vec![interface("I", Vec::new())], Vec::new())]),
        ),
        file(
            "b.d.ts",
            module("<ROOT>", Vec::new(), vec![module("N", vec![interface("J", Vec::new())], Vec::new())]),
        ),
    ]);
    let output = run(merge_modules, input);
    let first = &output.sources[0].root;
    assert_eq!(first.submodules.len(), 1);
    assert_eq!(names(&first.submodules[0].declarations), vec!["I", "J"]);
    assert!(output.sources[1].root.submodules.is_empty());
}

#[test]
fn test_merge_modules_recurses_into_children() {
    let input = source_set(vec![
        file(
            "a.d.ts",
            module(
                "<ROOT>",
                Vec::new(),
                vec![module("N", Vec::new(), vec![module("N.M", vec![class("A", Vec::new())], Vec::new())])],
            ),
        ),
        file(
            "b.d.ts",
            module(
                "<ROOT>",
                Vec::new(),
                vec![module(
                    "N",
                    Vec::new(),
                    vec![
                        module("N.M", vec![class("B", Vec::new())], Vec::new()),
                        module("N.K", vec![class("C", Vec::new())], Vec::new()),
                    ],
                )],
            ),
        ),
    ]);
    let output = run(merge_modules, input);
    let n = &output.sources[0].root.submodules[0];
    let children: Vec<String> = n.submodules.iter().map(|module| module.name.to_string()).collect();
    assert_eq!(children, vec!["N.M", "N.K"]);
    assert_eq!(names(&n.submodules[0].declarations), vec!["A", "B"]);
}

#[test]
fn test_merge_modules_keeps_file_roots_apart() {
    let input = source_set(vec![
        file("a.d.ts", module("<ROOT>", vec![class("A", Vec::new())], Vec::new())),
        file("b.d.ts", module("<ROOT>", vec![class("B", Vec::new())], Vec::new())),
    ]);
    let output = run(merge_modules, input);
    assert_eq!(names(&output.sources[0].root.declarations), vec!["A"]);
    assert_eq!(names(&output.sources[1].root.declarations), vec!["B"]);
}

// =============================================================================
// merge_classes_and_interfaces
// =============================================================================

#[test]
fn test_class_and_interface_merge_at_first_occurrence() {
    let input = single_root(vec![
        interface("Foo", vec![property("a", value("String"))]),
        class("Other", Vec::new()),
        class("Foo", vec![method("run", &[])]),
    ]);
    let output = run(merge_classes_and_interfaces, input);
    let declarations = &output.sources[0].root.declarations;
    assert_eq!(names(declarations), vec!["Foo", "Other"]);
    let foo = as_class(&declarations[0]);
    assert_eq!(member_names(&foo.members), vec!["a", "run"]);
    let MemberModel::Property(a) = &foo.members[0] else {
        panic!("expected property");
    };
    assert!(!a.open);
}

#[test]
fn test_class_and_interface_merge_last_writer_wins() {
    let input = single_root(vec![
        class("Foo", vec![property("a", value("String")), property("b", value("String"))]),
        interface("Foo", vec![property("a", value("Number"))]),
    ]);
    let output = run(merge_classes_and_interfaces, input);
    let foo = as_class(&output.sources[0].root.declarations[0]);
    assert_eq!(member_names(&foo.members), vec!["a", "b"]);
    let MemberModel::Property(a) = &foo.members[0] else {
        panic!("expected property");
    };
    assert_eq!(a.type_.to_string(), "Number");
}

#[test]
fn test_class_and_interface_merge_keeps_same_arity_overloads() {
    let input = single_root(vec![
        class("Foo", vec![method("f", &[("a", "String")])]),
        interface("Foo", vec![method("f", &[("a", "Number")])]),
    ]);
    let output = run(merge_classes_and_interfaces, input);
    let foo = as_class(&output.sources[0].root.declarations[0]);
    assert_eq!(foo.members.len(), 2);
}

#[test]
fn test_class_and_interface_merge_is_associative_over_order() {
    let parts = || {
        vec![
            interface("Foo", vec![property("a", value("String"))]),
            class("Foo", vec![property("b", value("String"))]),
            interface("Foo", vec![property("c", value("String"))]),
        ]
    };
    let together = run(merge_classes_and_interfaces, single_root(parts()));
    let split = run(
        merge_classes_and_interfaces,
        source_set(vec![
            file("a.d.ts", module("<ROOT>", parts().into_iter().take(2).collect(), Vec::new())),
            file("b.d.ts", module("<ROOT>", parts().into_iter().skip(2).collect(), Vec::new())),
        ]),
    );
    let together = as_class(&together.sources[0].root.declarations[0]);
    let split_class = as_class(&split.sources[0].root.declarations[0]);
    assert_eq!(member_names(&together.members), member_names(&split_class.members));
    assert!(split.sources[1].root.declarations.is_empty());
}

#[test]
fn test_interfaces_without_class_are_untouched() {
    let input = single_root(vec![interface("Foo", Vec::new()), interface("Bar", Vec::new())]);
    let output = run(merge_classes_and_interfaces, input.clone());
    assert_eq!(output, input);
}

// =============================================================================
// merge_vars_and_interfaces
// =============================================================================

#[test]
fn test_var_with_local_interface_becomes_companion_members() {
    let input = single_root(vec![
        interface("Foo", vec![property("a", value("String"))]),
        interface("FooConstructor", vec![method("create", &[])]),
        variable("Foo", value("FooConstructor")),
    ]);
    let output = run(merge_vars_and_interfaces, input);
    let declarations = &output.sources[0].root.declarations;
    assert_eq!(names(declarations), vec!["Foo", "FooConstructor"]);
    let foo = as_interface(&declarations[0]);
    let companion = foo.companion_object.as_ref().unwrap();
    assert_eq!(companion.name.to_string(), "Companion");
    assert_eq!(member_names(&companion.members), vec!["create"]);
}

#[test]
fn test_var_with_foreign_interface_becomes_companion_parent() {
    let input = single_root(vec![class("Foo", Vec::new()), variable("Foo", value("lib.FooStatic"))]);
    let output = run(merge_vars_and_interfaces, input);
    let declarations = &output.sources[0].root.declarations;
    assert_eq!(names(declarations), vec!["Foo"]);
    let companion = as_class(&declarations[0]).companion_object.as_ref().unwrap();
    assert!(companion.members.is_empty());
    assert_eq!(companion.parent_entities[0].value.value.to_string(), "lib.FooStatic");
}

#[test]
fn test_var_without_namesake_stays() {
    let input = single_root(vec![interface("I", Vec::new()), variable("v", value("I"))]);
    let output = run(merge_vars_and_interfaces, input.clone());
    assert_eq!(output, input);
}

// =============================================================================
// merge_nested_classes
// =============================================================================

#[test]
fn test_dotted_declarations_move_into_outer() {
    let input = single_root(vec![
        class("Outer", Vec::new()),
        class("Outer.Inner", Vec::new()),
        interface("Outer.Inner.Deep", Vec::new()),
    ]);
    let output = run(merge_nested_classes, input);
    let declarations = &output.sources[0].root.declarations;
    assert_eq!(names(declarations), vec!["Outer"]);
    let outer = as_class(&declarations[0]);
    let MemberModel::Nested(inner) = &outer.members[0] else {
        panic!("expected nested member");
    };
    assert_eq!(inner.name().to_string(), "Inner");
    assert_eq!(member_names(&as_class(inner).members), vec!["Deep"]);
}

#[test]
fn test_dotted_declaration_without_outer_stays() {
    let input = single_root(vec![class("Missing.Inner", Vec::new())]);
    let output = run(merge_nested_classes, input.clone());
    assert_eq!(output, input);
}

#[test]
fn test_submodule_named_like_class_nests_class_likes() {
    let input = source_set(vec![file(
        "index.d.ts",
        module(
            "<ROOT>",
            vec![class("Widget", Vec::new())],
            vec![module(
                "Widget",
                vec![interface("Options", Vec::new()), variable("defaults", value("Options"))],
                Vec::new(),
            )],
        ),
    )]);
    let output = run(merge_nested_classes, input);
    let root = &output.sources[0].root;
    assert_eq!(member_names(&as_class(&root.declarations[0]).members), vec!["Options"]);
    assert_eq!(root.submodules.len(), 1);
    assert_eq!(names(&root.submodules[0].declarations), vec!["defaults"]);
}

#[test]
fn test_emptied_submodule_is_removed() {
    let input = source_set(vec![file(
        "index.d.ts",
        module(
            "<ROOT>",
            vec![class("Widget", Vec::new())],
            vec![module("Widget", vec![class("Part", Vec::new())], Vec::new())],
        ),
    )]);
    let output = run(merge_nested_classes, input);
    assert!(output.sources[0].root.submodules.is_empty());
}

// =============================================================================
// add_explicit_getters_and_setters
// =============================================================================

#[test]
fn test_nullable_interface_properties_get_accessors() {
    let mut readonly = property("id", nullable("String"));
    if let MemberModel::Property(property) = &mut readonly {
        property.immutable = true;
    }
    let input = single_root(vec![
        interface("Options", vec![property("name", nullable("String")), property("size", value("Number")), readonly]),
        class("Impl", vec![property("name", nullable("String"))]),
    ]);
    let output = run(add_explicit_getters_and_setters, input);
    let declarations = &output.sources[0].root.declarations;
    let accessors: Vec<(bool, bool)> = as_interface(&declarations[0])
        .members
        .iter()
        .filter_map(|member| match member {
            MemberModel::Property(property) => Some((property.getter, property.setter)),
            _ => None,
        })
        .collect();
    assert_eq!(accessors, vec![(true, true), (false, false), (true, false)]);
    let MemberModel::Property(class_property) = &as_class(&declarations[1]).members[0] else {
        panic!("expected property");
    };
    assert!(!class_property.getter);
}

// =============================================================================
// lower_overrides
// =============================================================================

fn heritage(name: &str, fq_name: Option<&str>) -> HeritageModel {
    HeritageModel {
        value: TypeValueModel {
            value: NameEntity::from(name),
            params: Vec::new(),
            metadata: None,
            fq_name: fq_name.map(NameEntity::from),
            nullable: false,
        },
        type_params: Vec::new(),
    }
}

fn with_parents(mut declaration: TopLevelModel, parents: Vec<HeritageModel>) -> TopLevelModel {
    match &mut declaration {
        TopLevelModel::Class(class) => class.parent_entities = parents,
        TopLevelModel::Interface(interface) => interface.parent_entities = parents,
        _ => {}
    }
    declaration
}

fn overrides(members: &[MemberModel]) -> Vec<(String, Option<String>)> {
    members
        .iter()
        .filter_map(|member| match member {
            MemberModel::Method(method) => Some((method.name.clone(), method.override_.as_ref().map(ToString::to_string))),
            MemberModel::Property(property) => {
                Some((property.name.clone(), property.override_.as_ref().map(ToString::to_string)))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn test_overrides_point_at_nearest_declaring_ancestor() {
    let mut counter = property("counter", value("Number"));
    if let MemberModel::Property(property) = &mut counter {
        property.static_ = true;
    }
    let input = single_root(vec![
        interface("Base", vec![property("name", value("String")), method("greet", &[("who", "String")])]),
        with_parents(interface("Mid", vec![property("name", value("String"))]), vec![heritage("Base", None)]),
        with_parents(
            class(
                "Impl",
                vec![
                    property("name", value("String")),
                    method("greet", &[("who", "String")]),
                    method("greet", &[("count", "Number")]),
                    counter,
                    method("extra", &[]),
                ],
            ),
            vec![heritage("Mid", None)],
        ),
    ]);
    let output = run(lower_overrides, input);
    let declarations = &output.sources[0].root.declarations;
    assert_eq!(
        overrides(&as_class(&declarations[2]).members),
        vec![
            ("name".to_string(), Some("Mid".to_string())),
            ("greet".to_string(), Some("Base".to_string())),
            ("greet".to_string(), None),
            ("counter".to_string(), None),
            ("extra".to_string(), None),
        ]
    );
    assert_eq!(
        overrides(&as_interface(&declarations[1]).members),
        vec![("name".to_string(), Some("Base".to_string()))]
    );
    assert_eq!(
        overrides(&as_interface(&declarations[0]).members),
        vec![("name".to_string(), None), ("greet".to_string(), None)]
    );
}

#[test]
fn test_overrides_follow_qualified_parents_across_modules() {
    let input = source_set(vec![file(
        "index.d.ts",
        module(
            "<ROOT>",
            vec![with_parents(
                class("Impl", vec![method("close", &[])]),
                vec![heritage("Closeable", Some("io.Closeable")), heritage("Missing", Some("<LIBROOT>.Missing"))],
            )],
            vec![module("io", vec![interface("Closeable", vec![method("close", &[])])], Vec::new())],
        ),
    )]);
    let output = run(lower_overrides, input);
    assert_eq!(
        overrides(&as_class(&output.sources[0].root.declarations[0]).members),
        vec![("close".to_string(), Some("io.Closeable".to_string()))]
    );
}

#[test]
fn test_overrides_terminate_on_inheritance_cycles() {
    let input = single_root(vec![
        with_parents(interface("A", vec![property("x", value("Number"))]), vec![heritage("B", None)]),
        with_parents(interface("B", vec![property("x", value("Number"))]), vec![heritage("A", None)]),
        with_parents(interface("C", vec![property("y", value("Number"))]), vec![heritage("C", None)]),
    ]);
    let output = run(lower_overrides, input);
    let declarations = &output.sources[0].root.declarations;
    assert_eq!(overrides(&as_interface(&declarations[0]).members), vec![("x".to_string(), Some("B".to_string()))]);
    assert_eq!(overrides(&as_interface(&declarations[1]).members), vec![("x".to_string(), Some("A".to_string()))]);
    assert_eq!(overrides(&as_interface(&declarations[2]).members), vec![("y".to_string(), None)]);
}
