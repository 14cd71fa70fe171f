use super::*;

fn parameter(name: &str, ty: TypeNode) -> ParameterNode {
    ParameterNode::new(name, ty)
}

#[test]
fn test_display_value_and_generic() {
    assert_eq!(TypeNode::value("Foo").to_string(), "Foo");
    let generic = TypeNode::generic("Map", vec![TypeNode::value("K"), TypeNode::value("V")]);
    assert_eq!(generic.to_string(), "Map<K, V>");
    assert_eq!(TypeNode::generic("Foo", vec![TypeNode::value("A")]).make_nullable().to_string(), "Foo<A>?");
}

#[test]
fn test_display_function_groups_nullable() {
    let function = TypeNode::Function(FunctionTypeNode {
        parameters: vec![parameter("a", TypeNode::value("A"))],
        return_type: Box::new(TypeNode::value("R")),
        nullable: false,
        meta: None,
    });
    assert_eq!(function.to_string(), "(a: A) -> R");
    assert_eq!(function.make_nullable().to_string(), "((a: A) -> R)?");
}

#[test]
fn test_display_union_tuple_this() {
    let union = TypeNode::Union(UnionTypeNode {
        params: vec![TypeNode::value("A"), TypeNode::value("B")],
        nullable: false,
    });
    assert_eq!(union.to_string(), "A | B");
    let tuple = TypeNode::Tuple(TupleTypeNode {
        params: vec![TypeNode::value("A"), TypeNode::value("B")],
        nullable: false,
    });
    assert_eq!(tuple.to_string(), "[A, B]");
    assert_eq!(TypeNode::This(ThisTypeNode::default()).to_string(), "this");
}

#[test]
fn test_display_ignores_meta() {
    let literal = TypeNode::value("String").with_meta(TypeMeta::StringLiteral("a".to_string()));
    assert_eq!(literal.to_string(), "String");
}

#[test]
fn test_display_vararg_parameter() {
    let mut rest = parameter("items", TypeNode::value("T"));
    rest.vararg = true;
    assert_eq!(rest.to_string(), "vararg items: T");
}

#[test]
fn test_dynamic_detection() {
    assert!(TypeNode::dynamic(None).is_dynamic());
    assert!(TypeNode::dynamic(Some("symbol".to_string())).is_dynamic());
    assert!(!TypeNode::value("Dynamic").is_dynamic());
    assert!(!TypeNode::value("a.dynamic").is_dynamic());
}

#[test]
fn test_null_like() {
    assert!(TypeNode::value("null").is_null_like());
    assert!(TypeNode::value("undefined").is_null_like());
    assert!(!TypeNode::value("Nothing").is_null_like());
    assert!(!TypeNode::generic("null", vec![TypeNode::value("A")]).is_null_like());
}

#[test]
fn test_with_nullable_on_every_variant() {
    let types = [
        TypeNode::value("A"),
        TypeNode::Union(UnionTypeNode {
            params: Vec::new(),
            nullable: false,
        }),
        TypeNode::This(ThisTypeNode::default()),
        TypeNode::TypeParameter(TypeParameterNode {
            name: "T".into(),
            nullable: false,
            meta: None,
        }),
    ];
    for ty in types {
        assert!(!ty.is_nullable());
        assert!(ty.make_nullable().is_nullable());
    }
}

#[test]
fn test_with_meta_skips_variants_without_slot() {
    let union = TypeNode::Union(UnionTypeNode {
        params: vec![TypeNode::value("A")],
        nullable: false,
    });
    assert_eq!(union.with_meta(TypeMeta::Mute).meta(), None);
    assert_eq!(TypeNode::value("A").with_meta(TypeMeta::Mute).meta(), Some(&TypeMeta::Mute));
}

#[test]
fn test_reference_origin_follows_uid() {
    assert_eq!(ReferenceNode::new(Uid::new("lib-3")).origin, ReferenceOrigin::Library);
    assert_eq!(ReferenceNode::new(Uid::new("src-3")).origin, ReferenceOrigin::Local);
}

#[test]
fn test_parameter_serializes_type_key() {
    let json = serde_json::to_value(parameter("a", TypeNode::value("A"))).unwrap();
    assert!(json.get("type").is_some());
    assert!(json.get("type_").is_none());
}
