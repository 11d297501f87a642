//! Integration tests for GraphBuilder
//!
//! Tests declaration loading, forward references, and load-time validation.

use heritage_foundation::{AttrType, AttrValue, ErrorKind, TagInstance};
use heritage_model::{
    ClassKind, DeclarationSource, GraphBuilder, Modifiers, TypeRef, Visibility,
};

// =============================================================================
// Platform declarations
// =============================================================================

#[test]
fn new_builder_declares_root_and_marker() {
    let b = GraphBuilder::new();
    let root = b.root().unwrap();
    let marker = b.marker().unwrap();
    let graph = b.build().unwrap();

    assert_eq!(graph.class_name(root), "lang.Object");
    assert_eq!(graph.class_name(marker), "lang.tag.Tag");
    assert_eq!(graph.root_class(), Some(root));
    assert_eq!(graph.marker_interface(), Some(marker));
    assert!(graph.class(root).unwrap().superclass.is_none());
    assert!(graph.is_reserved_tag_type(marker));
}

#[test]
fn bare_builder_has_no_platform_types() {
    let mut b = GraphBuilder::bare();
    let a = b.class("A").finish();
    let graph = b.build().unwrap();

    assert_eq!(graph.root_class(), None);
    assert_eq!(graph.class(a).unwrap().superclass, None);
    assert_eq!(graph.package_of(a), "");
}

#[test]
fn custom_root_and_reserved_namespace() {
    let mut b = GraphBuilder::bare();
    let root = b.class("sys.Base").finish();
    b.set_root(Some(root));
    let marker = b.interface("sys.meta.Annotation").finish();
    b.set_marker(Some(marker));
    b.reserve_namespace("sys.meta");
    let meta = b.tag_type("sys.meta.Doc").finish();
    let nested_meta = b.tag_type("sys.meta.inner.Note").finish();
    let lookalike = b.tag_type("sys.metadata.Note").finish();
    let child = b.class("app.Child").finish();
    let graph = b.build().unwrap();

    assert_eq!(graph.class(child).unwrap().superclass, Some(root));
    assert_eq!(graph.marker_interface(), Some(marker));
    assert_eq!(graph.class(meta).unwrap().interfaces, vec![marker]);
    assert!(graph.is_reserved_tag_type(meta));
    assert!(graph.is_reserved_tag_type(nested_meta));
    assert!(!graph.is_reserved_tag_type(lookalike));
}

// =============================================================================
// Classes
// =============================================================================

#[test]
fn forward_references_resolve_once_declared() {
    let mut b = GraphBuilder::new();
    let base = b.reference("org.example.Base");
    let derived = b.class("org.example.Derived").extends(base).finish();
    let declared = b.class("org.example.Base").finish();
    let graph = b.build().unwrap();

    assert_eq!(base, declared);
    assert_eq!(graph.class(derived).unwrap().superclass, Some(base));
    assert!(graph.is_loaded(base));
}

#[test]
fn undeclared_reference_stays_unresolved() {
    let mut b = GraphBuilder::new();
    let missing = b.reference("org.example.Missing");
    let graph = b.build().unwrap();

    assert!(!graph.is_loaded(missing));
    let err = graph.class(missing).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvedType(ref n) if n == "org.example.Missing"));
}

#[test]
fn class_kinds_and_flags() {
    let mut b = GraphBuilder::new();
    let ifc = b.interface("org.example.Api").finish();
    let tag = b.tag_type("org.example.Fast").finish();
    let int = b.primitive("int");
    let outer = b.class("org.example.Outer").finish();
    let inner = b.class("org.example.Outer$Inner").enclosed_by(outer).finish();
    let nested = b.class("org.example.Outer$Nested").nested_in(outer).finish();
    let hidden = b
        .class("org.example.Hidden")
        .visibility(Visibility::Package)
        .modifiers(Modifiers::FINAL)
        .finish();
    let graph = b.build().unwrap();

    assert!(graph.class(ifc).unwrap().is_interface());
    assert!(graph.class(tag).unwrap().is_tag_type());
    assert!(graph.class(tag).unwrap().is_interface());
    assert_eq!(graph.class(int).unwrap().kind, ClassKind::Primitive);
    assert!(graph.class(inner).unwrap().is_inner());
    assert!(!graph.class(nested).unwrap().is_inner());
    assert_eq!(graph.class(nested).unwrap().enclosing, Some(outer));
    assert_eq!(graph.class(outer).unwrap().nested, vec![inner, nested]);

    let hidden = graph.class(hidden).unwrap();
    assert_eq!(hidden.visibility, Visibility::Package);
    assert!(hidden.modifiers.is_final());
}

#[test]
fn interfaces_have_no_implicit_superclass() {
    let mut b = GraphBuilder::new();
    let ifc = b.interface("org.example.Api").finish();
    let graph = b.build().unwrap();
    assert_eq!(graph.class(ifc).unwrap().superclass, None);
}

#[test]
fn duplicate_class_fails_build() {
    let mut b = GraphBuilder::new();
    b.class("org.example.A").finish();
    b.interface("org.example.A").finish();

    let err = b.build().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateDeclaration(_)));
    assert_eq!(format!("{err}"), "duplicate declaration: org.example.A");
}

#[test]
fn self_extension_is_an_inheritance_cycle() {
    let mut b = GraphBuilder::new();
    let a = b.reference("org.example.A");
    b.class("org.example.A").extends(a).finish();

    let err = b.build().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InheritanceCycle(_)));
}

// =============================================================================
// Members
// =============================================================================

#[test]
fn members_are_recorded_in_load_order() {
    let mut b = GraphBuilder::new();
    let string = b.class("lang.String").finish();
    let class = b.class("org.example.C").finish();
    let first = b.method(class, "run").finish();
    let second = b.method(class, "run").param(string).returns(string).finish();
    let field = b.field(class, "name", string).finish();
    let graph = b.build().unwrap();

    let decl = graph.class(class).unwrap();
    assert_eq!(decl.methods, vec![first, second]);
    assert_eq!(decl.fields, vec![field]);

    let second = graph.method(second).unwrap();
    assert_eq!(graph.name(second.name), "run");
    assert_eq!(second.parameter_count(), 1);
    assert_eq!(second.return_type, Some(TypeRef::of(string)));
    assert_eq!(graph.field(field).unwrap().ty, TypeRef::of(string));
}

#[test]
fn interface_method_modifiers() {
    let mut b = GraphBuilder::new();
    let ifc = b.interface("org.example.Api").finish();
    let run = b.method(ifc, "run").finish();
    let helper = b.method(ifc, "helper").modifiers(Modifiers::DEFAULT).finish();
    let create = b.method(ifc, "create").modifiers(Modifiers::STATIC).finish();
    let class = b.class("org.example.C").finish();
    let concrete = b.method(class, "run").finish();
    let graph = b.build().unwrap();

    assert!(graph.method(run).unwrap().modifiers.is_abstract());
    assert!(!graph.method(helper).unwrap().modifiers.is_abstract());
    assert!(!graph.method(create).unwrap().modifiers.is_abstract());
    assert!(!graph.method(concrete).unwrap().modifiers.is_abstract());
}

#[test]
fn parameters_carry_names_and_tags() {
    let mut b = GraphBuilder::new();
    let string = b.class("lang.String").finish();
    let tag = b.tag_type("org.example.NotNull").finish();
    let class = b.class("org.example.C").finish();
    let method = b
        .method(class, "greet")
        .parameter(TypeRef::of(string), Some("who"), [TagInstance::new(tag)])
        .type_param(string)
        .finish();
    let graph = b.build().unwrap();

    let param = graph.parameter(method.parameter(0)).unwrap();
    assert_eq!(param.name.map(|n| graph.name(n)), Some("who"));
    assert_eq!(param.tags, vec![TagInstance::new(tag)]);
    assert!(graph.method(method).unwrap().is_generic());
    assert!(graph.parameter(method.parameter(2)).is_err());
}

#[test]
fn member_on_unresolved_class_fails_build() {
    let mut b = GraphBuilder::new();
    let ghost = b.reference("org.example.Ghost");
    let string = b.class("lang.String").finish();
    b.field(ghost, "name", string).finish();

    let err = b.build().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Internal(_)));
    assert!(format!("{err}").contains("org.example.Ghost"));
}

// =============================================================================
// Tag types
// =============================================================================

#[test]
fn tag_type_info() {
    let mut b = GraphBuilder::new();
    let marker = b.marker().unwrap();
    let tag = b
        .tag_type("org.example.Timeout")
        .inherited()
        .attribute("value", AttrType::Int)
        .attribute("unit", AttrType::Str)
        .finish();
    let graph = b.build().unwrap();

    let decl = graph.class(tag).unwrap();
    assert_eq!(decl.interfaces, vec![marker]);
    let info = graph.tag_info(tag).unwrap();
    assert!(info.inherited);
    assert_eq!(info.container, None);
    assert_eq!(info.attributes.len(), 2);
}

#[test]
fn tag_info_of_plain_class_is_an_error() {
    let mut b = GraphBuilder::new();
    let class = b.class("org.example.C").finish();
    let graph = b.build().unwrap();

    let err = graph.tag_info(class).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotATagType(_)));
}

#[test]
fn tag_attribute_values_are_type_checked() {
    let mut b = GraphBuilder::new();
    let (_, container) = b.repeatable_tag("org.example.Tag", "org.example.Tags", false);
    let wrong = b.tag_type("org.example.Wrong").finish();
    let class = b.class("org.example.C").finish();
    b.field(class, "f", class)
        .tag(TagInstance::container(container, [TagInstance::new(wrong)]))
        .finish();

    let err = b.build().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidAttribute { .. }));
    assert!(format!("{err}").starts_with("attribute value of org.example.Tags expects"));

    let mut b = GraphBuilder::new();
    let (tag, container) = b.repeatable_tag("org.example.Tag", "org.example.Tags", false);
    let ok = b.tag_with(tag, [("label", AttrValue::from("a"))]);
    b.class("org.example.C")
        .tag(TagInstance::container(container, [ok]))
        .finish();
    assert!(b.build().is_ok());
}
