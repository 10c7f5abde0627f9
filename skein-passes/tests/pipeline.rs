//! End-to-end runs of the whole pipeline against the built-in store.
use skein_ast::{build, find_kind, Kind, Literal, Node, NodeKind, RRC};
use skein_passes::{compile, export_components};
use skein_store::LocalStore;
use skein_utils::Severity;

fn targets(
    manifest: &skein_passes::Manifest,
    key: &str,
) -> Option<Vec<String>> {
    manifest.connections.get(key).cloned()
}

#[test]
fn empty_script() {
    let root = build::block(None, vec![]);
    let store = LocalStore::new();
    let (manifest, reports) = compile(&root, "s", &store);
    assert!(reports.is_empty());
    assert_eq!(
        serde_json::to_value(&manifest).unwrap(),
        serde_json::json!({
            "name": "s",
            "actors": {},
            "connections": {},
            "valid": true
        })
    );
}

#[test]
fn single_actor_loop() {
    let root = build::block(
        None,
        vec![
            build::assignment("a", "std.Identity", vec![]),
            build::link(build::outport("a", "out"), build::inport("a", "in")),
        ],
    );
    let store = LocalStore::new();
    let (manifest, reports) = compile(&root, "s", &store);
    assert!(reports.is_empty());
    assert!(manifest.valid);

    let actor = manifest.actors.get("s:a").unwrap();
    assert_eq!(actor.actor_type, "std.Identity");
    assert!(actor.args.is_empty());
    assert!(!actor.signature.is_empty());
    assert_eq!(
        targets(&manifest, "s:a.out"),
        Some(vec!["s:a.in".to_string()])
    );
}

#[test]
fn literal_port_synthesizes_a_constant() {
    let root = build::block(
        None,
        vec![
            build::assignment("a", "std.Identity", vec![]),
            build::link(
                build::implicit_port(Literal::Int(42)),
                build::inport("a", "in"),
            ),
        ],
    );
    let store = LocalStore::new();
    let (manifest, reports) = compile(&root, "s", &store);
    assert!(reports.is_empty());

    assert!(manifest.actors.contains_key("s:a"));
    let constant = manifest.actors.get("s:_literal_const_1").unwrap();
    assert_eq!(constant.actor_type, "std.Constant");
    assert_eq!(constant.args.get("data"), Some(&Literal::Int(42)));
    assert_eq!(constant.args.get("n"), Some(&Literal::Int(-1)));
    assert_eq!(
        targets(&manifest, "s:_literal_const_1.token"),
        Some(vec!["s:a.in".to_string()])
    );
}

/// `component C(x) in -> out { i: std.Identity(); .in > i.in; i.out > .out }`
fn identity_component(name: &str, inner: &str) -> RRC<Node> {
    build::component(
        name,
        &["x"],
        build::block(
            None,
            vec![
                build::assignment(
                    inner,
                    "std.Identity",
                    vec![("n", build::id_ref("x"))],
                ),
                build::link(
                    build::internal_inport("in"),
                    build::inport(inner, "in"),
                ),
                build::link(
                    build::outport(inner, "out"),
                    build::internal_outport("out"),
                ),
            ],
        ),
    )
}

#[test]
fn component_expansion_wires_through_the_boundary() {
    let root = build::block(
        None,
        vec![
            identity_component("C", "i"),
            build::assignment("src", "std.Identity", vec![]),
            build::assignment("dst", "std.Identity", vec![]),
            build::assignment(
                "c",
                "C",
                vec![("x", build::value(Literal::Int(7)))],
            ),
            build::link(build::outport("src", "out"), build::inport("c", "in")),
            build::link(build::outport("c", "out"), build::inport("dst", "in")),
        ],
    );
    let store = LocalStore::new();
    let (manifest, reports) = compile(&root, "s", &store);
    assert!(!reports.iter().any(|r| r.is_error()));
    assert!(manifest.valid);

    let inlined = manifest.actors.get("s:c:i").unwrap();
    assert_eq!(inlined.actor_type, "std.Identity");
    assert_eq!(inlined.args.get("n"), Some(&Literal::Int(7)));
    assert!(!manifest.actors.contains_key("s:c"));

    assert_eq!(
        targets(&manifest, "s:src.out"),
        Some(vec!["s:c:i.in".to_string()])
    );
    assert_eq!(
        targets(&manifest, "s:c:i.out"),
        Some(vec!["s:dst.in".to_string()])
    );
}

#[test]
fn nested_components_qualify_twice() {
    let inner = identity_component("Inner", "leaf");
    let outer = build::component(
        "Outer",
        &["x"],
        build::block(
            None,
            vec![
                build::assignment(
                    "mid",
                    "Inner",
                    vec![("x", build::id_ref("x"))],
                ),
                build::link(
                    build::internal_inport("in"),
                    build::inport("mid", "in"),
                ),
                build::link(
                    build::outport("mid", "out"),
                    build::internal_outport("out"),
                ),
            ],
        ),
    );
    let root = build::block(
        None,
        vec![
            inner,
            outer,
            build::assignment("src", "std.Identity", vec![]),
            build::assignment("dst", "std.Identity", vec![]),
            build::assignment(
                "o",
                "Outer",
                vec![("x", build::value(Literal::Int(1)))],
            ),
            build::link(build::outport("src", "out"), build::inport("o", "in")),
            build::link(build::outport("o", "out"), build::inport("dst", "in")),
        ],
    );
    let store = LocalStore::new();
    let (manifest, _) = compile(&root, "s", &store);
    assert!(manifest.valid);

    let leaf = manifest.actors.get("s:o:mid:leaf").unwrap();
    assert_eq!(leaf.actor_type, "std.Identity");
    assert_eq!(leaf.args.get("n"), Some(&Literal::Int(1)));
    assert_eq!(
        targets(&manifest, "s:src.out"),
        Some(vec!["s:o:mid:leaf.in".to_string()])
    );
    assert_eq!(
        targets(&manifest, "s:o:mid:leaf.out"),
        Some(vec!["s:dst.in".to_string()])
    );
}

#[test]
fn unresolved_symbol_is_a_warning_only() {
    let root = build::block(
        None,
        vec![build::assignment(
            "a",
            "std.Identity",
            vec![("n", build::id_ref("missing"))],
        )],
    );
    let store = LocalStore::new();
    let (manifest, reports) = compile(&root, "s", &store);
    assert!(manifest.valid);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].severity, Severity::Warning);
    // the unresolved argument stays out of the manifest
    assert!(manifest.actors.get("s:a").unwrap().args.is_empty());
}

#[test]
fn recursive_component_invalidates_the_manifest() {
    // The depth cap is large enough that walking into it needs more stack
    // than the test harness's default thread allots.
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let root = build::block(
                None,
                vec![
                    build::component(
                        "Loop",
                        &[],
                        build::block(
                            None,
                            vec![build::assignment("again", "Loop", vec![])],
                        ),
                    ),
                    build::assignment("l", "Loop", vec![]),
                ],
            );
            let store = LocalStore::new();
            let (manifest, reports) = compile(&root, "s", &store);
            assert!(!manifest.valid);
            assert!(reports.iter().any(|r| r.is_error()));
        })
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn duplicate_components_report_and_later_wins() {
    let first = build::component(
        "C",
        &[],
        build::block(
            None,
            vec![build::assignment("from_first", "std.Identity", vec![])],
        ),
    );
    let second = build::component(
        "C",
        &[],
        build::block(
            None,
            vec![build::assignment("from_second", "std.Identity", vec![])],
        ),
    );
    let root = build::block(
        None,
        vec![first, second, build::assignment("c", "C", vec![])],
    );
    let store = LocalStore::new();
    let (manifest, reports) = compile(&root, "s", &store);
    assert!(reports.iter().any(|r| r.is_error()));
    assert!(!manifest.valid);
    assert!(manifest.actors.contains_key("s:c:from_second"));
    assert!(!manifest.actors.contains_key("s:c:from_first"));
}

#[test]
fn pipeline_leaves_only_flat_kinds() {
    let root = build::block(
        None,
        vec![
            identity_component("C", "i"),
            build::assignment("src", "std.Identity", vec![]),
            build::assignment(
                "c",
                "C",
                vec![("x", build::value(Literal::Int(2)))],
            ),
            build::link(build::outport("src", "out"), build::inport("c", "in")),
            build::link(
                build::implicit_port(Literal::Str("tick".into())),
                build::inport("src", "in"),
            ),
        ],
    );
    let store = LocalStore::new();
    let (_, reports) = compile(&root, "s", &store);
    assert!(!reports.iter().any(|r| r.is_error()));

    assert!(find_kind(&root, Kind::Component).is_empty());
    assert!(find_kind(&root, Kind::ImplicitPort).is_empty());
    assert!(find_kind(&root, Kind::InternalInPort).is_empty());
    assert!(find_kind(&root, Kind::InternalOutPort).is_empty());
    // a single block remains: the root
    assert_eq!(find_kind(&root, Kind::Block).len(), 1);
    for child in root.borrow().children() {
        assert!(matches!(
            child.borrow().kind,
            NodeKind::Assignment { .. } | NodeKind::Link
        ));
    }
}

#[test]
fn compilation_is_deterministic() {
    let make = || {
        build::block(
            None,
            vec![
                identity_component("C", "i"),
                build::assignment("src", "std.Identity", vec![]),
                build::assignment(
                    "c",
                    "C",
                    vec![("x", build::value(Literal::Int(2)))],
                ),
                build::link(
                    build::outport("src", "out"),
                    build::inport("c", "in"),
                ),
                build::link(
                    build::implicit_port(Literal::Int(8)),
                    build::inport("src", "in"),
                ),
            ],
        )
    };
    let store = LocalStore::new();
    let (first, _) = compile(&make(), "s", &store);
    let (second, _) = compile(&make(), "s", &store);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn export_returns_definitions_without_inlining() {
    let root = build::block(
        None,
        vec![
            identity_component("C", "i"),
            build::assignment("c", "C", vec![]),
        ],
    );
    let (components, reports) = export_components(&root);
    assert!(reports.is_empty());
    assert_eq!(components.len(), 1);
    match &components[0].borrow().kind {
        NodeKind::Component { name, arg_names } => {
            assert_eq!(name.to_string(), "C");
            assert_eq!(arg_names.len(), 1);
        }
        _ => panic!("expected a component definition"),
    }
    // the use site is untouched
    assert_eq!(find_kind(&root, Kind::Component).len(), 1);
    assert_eq!(find_kind(&root, Kind::Assignment).len(), 2);
}
