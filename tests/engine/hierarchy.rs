//! Integration tests for hierarchy walking
//!
//! Tests method and field discovery, override rules, ordering, and lookup.

use heritage_engine::{Engine, EngineConfig, TraversalDirection};
use heritage_foundation::{ClassId, FieldId, MethodId, TagInstance};
use heritage_model::{DeclarationGraph, DeclarationSource, GraphBuilder, Modifiers, Visibility};

fn method_names(engine: &Engine<DeclarationGraph>, methods: &[MethodId]) -> Vec<String> {
    let graph = engine.source();
    methods
        .iter()
        .map(|&m| {
            let decl = graph.method(m).unwrap();
            format!("{}.{}", graph.class_name(decl.declaring), graph.name(decl.name))
        })
        .collect()
}

fn field_names(engine: &Engine<DeclarationGraph>, fields: &[FieldId]) -> Vec<String> {
    let graph = engine.source();
    fields
        .iter()
        .map(|&f| {
            let decl = graph.field(f).unwrap();
            format!("{}.{}", graph.class_name(decl.declaring), graph.name(decl.name))
        })
        .collect()
}

/// `Leaf extends Mid extends Base`, declaring `c`, `b`, and `a` respectively.
fn chain() -> (Engine<DeclarationGraph>, ClassId) {
    let mut b = GraphBuilder::new();
    let base = b.class("p.Base").finish();
    b.method(base, "a").finish();
    let mid = b.class("p.Mid").extends(base).finish();
    b.method(mid, "b").finish();
    let leaf = b.class("p.Leaf").extends(mid).finish();
    b.method(leaf, "c").finish();
    (Engine::new(b.build().unwrap()), leaf)
}

// =============================================================================
// Traversal order
// =============================================================================

#[test]
fn top_down_lists_ancestors_first() {
    let (engine, leaf) = chain();
    let found = engine
        .find_methods(leaf, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &found), ["p.Base.a", "p.Mid.b", "p.Leaf.c"]);
}

#[test]
fn bottom_up_lists_class_first() {
    let (engine, leaf) = chain();
    let found = engine
        .find_methods(leaf, |_| true, TraversalDirection::BottomUp)
        .unwrap();
    assert_eq!(method_names(&engine, &found), ["p.Leaf.c", "p.Mid.b", "p.Base.a"]);
}

#[test]
fn local_methods_are_sorted_by_name_hash() {
    let mut b = GraphBuilder::new();
    let class = b.class("p.C").finish();
    // "run" hashes below "stop", which hashes below "setUp".
    b.method(class, "setUp").finish();
    b.method(class, "stop").finish();
    b.method(class, "run").finish();
    let engine = Engine::new(b.build().unwrap());

    let found = engine
        .find_methods(class, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &found), ["p.C.run", "p.C.stop", "p.C.setUp"]);
}

#[test]
fn queries_are_idempotent() {
    let (engine, leaf) = chain();
    let first = engine
        .find_methods(leaf, |_| true, TraversalDirection::TopDown)
        .unwrap();
    let second = engine
        .find_methods(leaf, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn class_hierarchy_stops_before_root() {
    let (engine, leaf) = chain();
    let graph = engine.source();
    let names: Vec<&str> = engine
        .class_hierarchy(leaf)
        .unwrap()
        .into_iter()
        .map(|c| graph.class_name(c))
        .collect();
    assert_eq!(names, ["p.Leaf", "p.Mid", "p.Base"]);
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn overridden_methods_are_dropped() {
    let mut b = GraphBuilder::new();
    let base = b.class("p.Base").finish();
    b.method(base, "run").finish();
    let derived = b.class("p.Derived").extends(base).finish();
    b.method(derived, "run").finish();
    let engine = Engine::new(b.build().unwrap());

    let found = engine
        .find_methods_by_name(derived, "run", TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &found), ["p.Derived.run"]);
}

#[test]
fn private_static_and_final_methods_are_never_overridden() {
    let mut b = GraphBuilder::new();
    let base = b.class("p.Base").finish();
    b.method(base, "a").visibility(Visibility::Private).finish();
    b.method(base, "b").modifiers(Modifiers::STATIC).finish();
    b.method(base, "c").modifiers(Modifiers::FINAL).finish();
    let derived = b.class("p.Derived").extends(base).finish();
    b.method(derived, "a").visibility(Visibility::Private).finish();
    b.method(derived, "b").modifiers(Modifiers::STATIC).finish();
    b.method(derived, "c").finish();
    let engine = Engine::new(b.build().unwrap());

    let found = engine
        .find_methods(derived, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(
        method_names(&engine, &found),
        ["p.Base.a", "p.Base.b", "p.Base.c", "p.Derived.a", "p.Derived.b", "p.Derived.c"]
    );
}

#[test]
fn package_private_methods_are_overridden_only_in_the_same_package() {
    let mut b = GraphBuilder::new();
    let base = b.class("lib.Base").finish();
    b.method(base, "run").visibility(Visibility::Package).finish();
    let same = b.class("lib.Same").extends(base).finish();
    b.method(same, "run").visibility(Visibility::Package).finish();
    let other = b.class("app.Other").extends(base).finish();
    b.method(other, "run").visibility(Visibility::Package).finish();
    let engine = Engine::new(b.build().unwrap());

    let in_same = engine
        .find_methods(same, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &in_same), ["lib.Same.run"]);

    let in_other = engine
        .find_methods(other, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &in_other), ["lib.Base.run", "app.Other.run"]);
}

#[test]
fn generic_parameters_accept_narrower_overrides() {
    let mut b = GraphBuilder::new();
    let object = b.root().unwrap();
    let string = b.class("lang.String").finish();
    let generic = b.class("p.Generic").finish();
    b.method(generic, "accept").type_param(object).finish();
    let narrowed = b.class("p.Narrowed").extends(generic).finish();
    b.method(narrowed, "accept").param(string).finish();

    let plain = b.class("p.Plain").finish();
    b.method(plain, "accept").param(object).finish();
    let overload = b.class("p.Overload").extends(plain).finish();
    b.method(overload, "accept").param(string).finish();
    let engine = Engine::new(b.build().unwrap());

    let found = engine
        .find_methods_by_name(narrowed, "accept", TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &found), ["p.Narrowed.accept"]);

    let found = engine
        .find_methods_by_name(overload, "accept", TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(found.len(), 2);
}

// =============================================================================
// Interfaces
// =============================================================================

#[test]
fn default_methods_are_local_methods() {
    let mut b = GraphBuilder::new();
    let api = b.interface("p.Api").finish();
    b.method(api, "a").finish();
    b.method(api, "d").modifiers(Modifiers::DEFAULT).finish();
    let class = b.class("p.Impl").implements(api).finish();
    b.method(class, "a").finish();
    let engine = Engine::new(b.build().unwrap());

    let top_down = engine
        .find_methods(class, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &top_down), ["p.Api.d", "p.Impl.a"]);

    let bottom_up = engine
        .find_methods(class, |_| true, TraversalDirection::BottomUp)
        .unwrap();
    assert_eq!(method_names(&engine, &bottom_up), ["p.Impl.a", "p.Api.d"]);
}

#[test]
fn overridden_default_method_is_dropped() {
    let mut b = GraphBuilder::new();
    let api = b.interface("p.Api").finish();
    b.method(api, "d").modifiers(Modifiers::DEFAULT).finish();
    let class = b.class("p.Impl").implements(api).finish();
    b.method(class, "d").finish();
    let engine = Engine::new(b.build().unwrap());

    let found = engine
        .find_methods(class, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &found), ["p.Impl.d"]);
}

#[test]
fn diamond_contributes_each_method_once() {
    let mut b = GraphBuilder::new();
    let top = b.interface("p.Top").finish();
    b.method(top, "m").modifiers(Modifiers::DEFAULT).finish();
    let left = b.interface("p.Left").implements(top).finish();
    let right = b.interface("p.Right").implements(top).finish();
    let class = b.class("p.Both").implements(left).implements(right).finish();
    let engine = Engine::new(b.build().unwrap());

    let found = engine
        .find_methods(class, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &found), ["p.Top.m"]);
}

#[test]
fn public_methods_exclude_inherited_interface_statics() {
    let mut b = GraphBuilder::new();
    let api = b.interface("p.Api").finish();
    b.method(api, "a").finish();
    b.method(api, "create").modifiers(Modifiers::STATIC).finish();
    let class = b.class("p.Impl").implements(api).finish();
    b.method(class, "b").finish();
    b.method(class, "c").visibility(Visibility::Protected).finish();
    let engine = Engine::new(b.build().unwrap());

    let on_class = engine.public_methods(class).unwrap();
    assert_eq!(method_names(&engine, &on_class), ["p.Api.a", "p.Impl.b"]);

    let on_interface = engine.public_methods(api).unwrap();
    assert_eq!(on_interface.len(), 2);
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn find_method_prefers_the_most_specific_declaration() {
    let mut b = GraphBuilder::new();
    let string = b.class("lang.String").finish();
    let api = b.interface("p.Api").finish();
    let greet = b.method(api, "greet").param(string).finish();
    let base = b.class("p.Base").finish();
    b.method(base, "run").finish();
    let derived = b.class("p.Derived").extends(base).implements(api).finish();
    let run = b.method(derived, "run").finish();
    let engine = Engine::new(b.build().unwrap());

    assert_eq!(engine.find_method(derived, "run", &[]).unwrap(), Some(run));
    assert_eq!(engine.find_method(derived, "greet", &[string]).unwrap(), Some(greet));
    assert_eq!(engine.find_method(derived, "greet", &[]).unwrap(), None);
    assert!(engine.is_method_present(derived, |m| m.parameter_count() == 1).unwrap());
}

#[test]
fn find_method_skips_the_root_class() {
    let mut b = GraphBuilder::new();
    let root = b.root().unwrap();
    b.method(root, "hashCode").finish();
    let class = b.class("p.C").finish();
    let engine = Engine::new(b.build().unwrap());

    assert_eq!(engine.find_method(class, "hashCode", &[]).unwrap(), None);
    assert!(engine
        .find_methods_by_name(class, "hashCode", TraversalDirection::TopDown)
        .unwrap()
        .is_empty());
}

#[test]
fn unresolved_superclass_contributes_nothing() {
    let mut b = GraphBuilder::new();
    let missing = b.reference("p.Missing");
    let class = b.class("p.C").extends(missing).finish();
    b.method(class, "run").finish();
    let engine = Engine::new(b.build().unwrap());

    let found = engine
        .find_methods(class, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &found), ["p.C.run"]);
    assert!(engine.find_methods(missing, |_| true, TraversalDirection::TopDown).is_err());
}

#[test]
fn annotated_methods_include_inherited_ones() {
    let mut b = GraphBuilder::new();
    let test = b.tag_type("p.Test").finish();
    let base = b.class("p.Base").finish();
    b.method(base, "a").tag(TagInstance::new(test)).finish();
    let derived = b.class("p.Derived").extends(base).finish();
    b.method(derived, "b").tag(TagInstance::new(test)).finish();
    b.method(derived, "c").finish();
    let engine = Engine::new(b.build().unwrap());

    let found = engine
        .find_annotated_methods(derived, test, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(method_names(&engine, &found), ["p.Base.a", "p.Derived.b"]);
    assert!(engine
        .find_annotated_methods(derived, base, TraversalDirection::TopDown)
        .is_err());
}

// =============================================================================
// Fields
// =============================================================================

/// `Derived extends Base implements Constants`; both classes declare `x`.
fn field_graph() -> (DeclarationGraph, ClassId, ClassId) {
    let mut b = GraphBuilder::new();
    let string = b.class("lang.String").finish();
    let int = b.primitive("int");
    let inject = b.tag_type("p.Inject").finish();
    let constants = b.interface("p.Constants").finish();
    b.field(constants, "id", int)
        .modifiers(Modifiers::STATIC | Modifiers::FINAL)
        .finish();
    let base = b.class("p.Base").finish();
    b.field(base, "x", string).tag(TagInstance::new(inject)).finish();
    let derived = b
        .class("p.Derived")
        .extends(base)
        .implements(constants)
        .finish();
    b.field(derived, "x", string)
        .visibility(Visibility::Private)
        .tag(TagInstance::new(inject))
        .finish();
    b.field(derived, "y", int).tag(TagInstance::new(inject)).finish();
    (b.build().unwrap(), derived, inject)
}

#[test]
fn same_named_fields_are_all_reported() {
    let (graph, derived, _) = field_graph();
    let engine = Engine::new(graph);

    let found = engine
        .find_fields(derived, |_| true, TraversalDirection::TopDown)
        .unwrap();
    assert_eq!(
        field_names(&engine, &found),
        ["p.Base.x", "p.Constants.id", "p.Derived.x", "p.Derived.y"]
    );
}

#[test]
fn legacy_shadowing_hides_same_named_fields() {
    let (graph, derived, _) = field_graph();
    let engine = Engine::with_config(graph, EngineConfig::default().with_legacy_field_shadowing(true));

    let found = engine
        .find_fields(derived, |_| true, TraversalDirection::BottomUp)
        .unwrap();
    assert_eq!(
        field_names(&engine, &found),
        ["p.Derived.x", "p.Derived.y", "p.Constants.id"]
    );
}

#[test]
fn annotated_fields_apply_the_predicate() {
    let (graph, derived, inject) = field_graph();
    let engine = Engine::new(graph);

    let found = engine
        .find_annotated_fields(
            derived,
            inject,
            |f| f.visibility == Visibility::Public,
            TraversalDirection::TopDown,
        )
        .unwrap();
    assert_eq!(field_names(&engine, &found), ["p.Base.x", "p.Derived.y"]);
}

#[test]
fn public_annotated_fields_filter_by_type() {
    let (graph, derived, inject) = field_graph();
    let string = graph.class_by_name("lang.String").unwrap();
    let root = graph.root_class().unwrap();
    let engine = Engine::new(graph);

    let strings = engine
        .find_public_annotated_fields(derived, string, inject)
        .unwrap();
    assert_eq!(field_names(&engine, &strings), ["p.Base.x"]);

    let objects = engine.find_public_annotated_fields(derived, root, inject).unwrap();
    assert_eq!(field_names(&engine, &objects), ["p.Base.x"]);
}
