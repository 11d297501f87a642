//! Concurrent queries against one engine and the process-wide caches.

use std::sync::Arc;
use std::thread;

use heritage::engine::{CyclePolicy, Engine, EngineConfig, ResolutionCaches, TraversalDirection};
use heritage::foundation::{AttrValue, ClassId, MethodId, TagInstance};
use heritage::model::{DeclarationGraph, GraphBuilder};

struct Fixture {
    graph: DeclarationGraph,
    derived: ClassId,
    tag: ClassId,
    run: MethodId,
    api_run: MethodId,
}

fn fixture(prefix: &str) -> Fixture {
    let mut b = GraphBuilder::new();
    let (tag, container) = b.repeatable_tag(
        &format!("{prefix}.Tag"),
        &format!("{prefix}.Tags"),
        true,
    );
    let t1 = b.tag_with(tag, [("n", AttrValue::from(1_i64))]);
    let t2 = b.tag_with(tag, [("n", AttrValue::from(2_i64))]);
    let api = b.interface(&format!("{prefix}.Api")).finish();
    let api_run = b.method(api, "run").finish();
    let base = b
        .class(&format!("{prefix}.Base"))
        .implements(api)
        .tag(t1)
        .finish();
    let run = b.method(base, "run").finish();
    let derived = b
        .class(&format!("{prefix}.Base$Derived"))
        .enclosed_by(base)
        .extends(base)
        .tag(TagInstance::container(container, [t2]))
        .finish();
    b.method(derived, "extra").finish();
    Fixture {
        graph: b.build().unwrap(),
        derived,
        tag,
        run,
        api_run,
    }
}

#[test]
fn shared_engine_answers_consistently_across_threads() {
    let f = fixture("conc");
    let engine = Arc::new(Engine::new(f.graph));
    let expected_methods = engine
        .find_methods(f.derived, |_| true, TraversalDirection::TopDown)
        .unwrap();
    engine.clear_caches();

    let (derived, tag, run, api_run) = (f.derived, f.tag, f.run, f.api_run);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut last = Vec::new();
                for _ in 0..50 {
                    last = engine
                        .find_methods(derived, |_| true, TraversalDirection::TopDown)
                        .unwrap();
                    let tags = engine.find_repeatable_tags(derived, tag).unwrap();
                    let mapped = engine.interface_method_if_possible(run, None).unwrap();
                    let cyclic = engine
                        .detect_inner_class_cycle(derived, CyclePolicy::AbortBranch)
                        .unwrap();
                    assert_eq!(tags.len(), 2);
                    assert_eq!(mapped, api_run);
                    assert!(cyclic);
                }
                last
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected_methods);
    }

    let stats = engine.cache_stats();
    assert_eq!(stats.interface_methods, 1);
    assert_eq!(stats.cycle_free_classes, 0);
}

#[test]
fn engines_can_share_the_global_caches() {
    let f = fixture("global");
    let outer = f.graph.class_by_name("global.Base").unwrap();
    let first = Engine::with_caches(
        f.graph.clone(),
        EngineConfig::default(),
        ResolutionCaches::global(),
    );
    let second = Engine::with_caches(f.graph, EngineConfig::default(), ResolutionCaches::global());

    assert!(!first.detect_inner_class_cycle(outer, CyclePolicy::Fail).unwrap());
    assert!(second.caches().is_cycle_free("global.Base"));
    assert!(Arc::ptr_eq(first.caches(), second.caches()));
}
