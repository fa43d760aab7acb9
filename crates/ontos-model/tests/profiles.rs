//! Integration tests: profile-dependent typing and the structural
//! guarantees of the hierarchy engine.
//!
//! The same graphs are viewed under several profiles; what changes is
//! which nodes present as which entities, never the graph itself.

use ontos_graph::vocab::{owl, rdf, rdfs, term, xsd};
use ontos_graph::{MemoryGraph, Term};
use ontos_model::{
    EntityRole, ModelConfig, OntError, OntModel, Profile, Specification, TypedView,
};

fn ex(name: &str) -> Term {
    Term::iri(format!("http://example.com/{name}"))
}

fn declare(g: &mut MemoryGraph, name: &str, marker: &str) {
    g.add(ex(name), term(rdf::TYPE), term(marker)).unwrap();
}

fn sub_class(g: &mut MemoryGraph, sub: &str, sup: &str) {
    g.add(ex(sub), term(rdfs::SUB_CLASS_OF), ex(sup)).unwrap();
}

/// A⊒B⊒C and D⊒E⊒C, with a few instances hanging off it.
fn diamond_with_instances() -> MemoryGraph {
    let mut g = MemoryGraph::new();
    for name in ["A", "B", "C", "D", "E"] {
        declare(&mut g, name, owl::CLASS);
    }
    sub_class(&mut g, "B", "A");
    sub_class(&mut g, "C", "B");
    sub_class(&mut g, "E", "D");
    sub_class(&mut g, "C", "E");
    g.add(ex("i"), term(rdf::TYPE), ex("C")).unwrap();
    g.add(ex("j"), term(rdf::TYPE), ex("B")).unwrap();
    g
}

fn classes<'a>(model: &OntModel<'a, MemoryGraph>, names: &[&str]) -> Vec<TypedView> {
    names
        .iter()
        .map(|n| model.resolve_class(&ex(n)).expect("class must resolve"))
        .collect()
}

#[test]
fn direct_results_are_subsets_of_indirect() {
    let g = diamond_with_instances();
    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    for view in classes(&model, &["A", "B", "C", "D", "E"]) {
        let pairs = [
            (model.super_classes(&view, true), model.super_classes(&view, false)),
            (model.sub_classes(&view, true), model.sub_classes(&view, false)),
            (model.individuals(&view, true), model.individuals(&view, false)),
            (
                model.declared_properties(&view, true),
                model.declared_properties(&view, false),
            ),
        ];
        for (direct, indirect) in pairs {
            for d in &direct {
                assert!(
                    indirect.contains(d),
                    "direct member {d} missing from indirect set of {view}"
                );
            }
        }
    }
}

#[test]
fn duality_of_sub_and_super() {
    let g = diamond_with_instances();
    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let views = classes(&model, &["A", "B", "C", "D", "E"]);
    for a in &views {
        for b in &views {
            for direct in [false, true] {
                let down = model.sub_classes(a, direct).contains(b);
                let up = model.super_classes(b, direct).contains(a);
                assert_eq!(down, up, "duality must hold for {a} / {b} direct={direct}");
            }
        }
    }
}

#[test]
fn antisymmetry_outside_equivalence_clusters() {
    let g = diamond_with_instances();
    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let views = classes(&model, &["A", "B", "C", "D", "E"]);
    for a in &views {
        for b in &views {
            if a == b {
                continue;
            }
            let a_above_b = model.super_classes(b, false).contains(a);
            let b_above_a = model.super_classes(a, false).contains(b);
            assert!(
                !(a_above_b && b_above_a),
                "{a} and {b} subsume each other without being equivalent"
            );
        }
    }
}

#[test]
fn boolean_queries_are_membership_tests() {
    let g = diamond_with_instances();
    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let views = classes(&model, &["A", "B", "C", "D", "E"]);
    let i = model.resolve_individual(&ex("i")).unwrap();
    for a in &views {
        for b in &views {
            for direct in [false, true] {
                assert_eq!(
                    model.has_sub_class(a, b, direct),
                    model.sub_classes(a, direct).contains(b),
                );
            }
        }
        for direct in [false, true] {
            assert_eq!(
                model.has_ont_class(&i, a, direct),
                model.individuals(a, direct).contains(&i),
                "individual membership must match the listing for {a} direct={direct}"
            );
        }
    }
}

#[test]
fn root_minimality() {
    let g = diamond_with_instances();
    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let top = model.resolve_class(&term(owl::THING)).unwrap();
    for root in model.named_hierarchy_roots() {
        let named_ancestors: Vec<_> = model
            .super_classes(&root, false)
            .into_iter()
            .filter(|a| a.term().is_named() && *a != top && *a != root)
            .collect();
        assert!(
            named_ancestors.is_empty(),
            "root {root} has named ancestors {named_ancestors:?}"
        );
    }
}

#[test]
fn lca_is_a_common_ancestor_nearest_to_both() {
    let mut g = diamond_with_instances();
    // F sits above both B and E, closer than the top
    declare(&mut g, "F", owl::CLASS);
    sub_class(&mut g, "B", "F");
    sub_class(&mut g, "E", "F");
    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let b = model.resolve_class(&ex("B")).unwrap();
    let e = model.resolve_class(&ex("E")).unwrap();

    let lca = model.get_lca(&b, &e).expect("lca must exist");
    assert_eq!(lca.term(), &ex("F"), "the shared intermediate beats the top");

    // ancestor-or-self of both sides
    for side in [&b, &e] {
        let ancestors = model.super_classes(side, false);
        assert!(
            ancestors.contains(&lca) || *side == lca,
            "lca must be an ancestor of {side}"
        );
    }
}

#[test]
fn property_hierarchy_mirrors_class_engine() {
    let mut g = MemoryGraph::new();
    for name in ["p", "q", "r"] {
        declare(&mut g, name, owl::OBJECT_PROPERTY);
    }
    g.add(ex("q"), term(rdfs::SUB_PROPERTY_OF), ex("p")).unwrap();
    g.add(ex("r"), term(rdfs::SUB_PROPERTY_OF), ex("q")).unwrap();
    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let p = model.resolve_property(&ex("p")).unwrap();
    let r = model.resolve_property(&ex("r")).unwrap();

    let indirect: Vec<_> = model.super_properties(&r, false);
    assert!(indirect.contains(&p));
    assert!(
        !indirect.iter().any(|v| v.term() == &term(owl::THING)),
        "no universal ancestor for properties"
    );
    assert!(model.has_sub_property(&p, &r, false));
    assert!(!model.has_sub_property(&p, &r, true));

    let q = model.resolve_property(&ex("q")).unwrap();
    assert_eq!(model.super_properties(&r, true), vec![q]);
}

#[test]
fn equivalent_properties_traverse_when_enabled() {
    let mut g = MemoryGraph::new();
    for name in ["p", "q", "r"] {
        declare(&mut g, name, owl::OBJECT_PROPERTY);
    }
    g.add(ex("p"), term(owl::EQUIVALENT_PROPERTY), ex("q")).unwrap();
    g.add(ex("q"), term(rdfs::SUB_PROPERTY_OF), ex("r")).unwrap();

    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let p = model.resolve_property(&ex("p")).unwrap();
    let supers = model.super_properties(&p, false);
    assert!(supers.iter().any(|v| v.term() == &ex("q")));
    assert!(supers.iter().any(|v| v.term() == &ex("r")));

    let mut config = ModelConfig::defaults_for(Profile::Owl2Dl);
    config.equivalent_property_feature = false;
    let model = OntModel::new(&g, Specification::with_config(Profile::Owl2Dl, config));
    let p = model.resolve_property(&ex("p")).unwrap();
    assert!(model.super_properties(&p, false).is_empty());
}

#[test]
fn restriction_roles_depend_on_profile() {
    let mut g = MemoryGraph::new();
    declare(&mut g, "A", owl::CLASS);
    declare(&mut g, "p", owl::OBJECT_PROPERTY);
    let r = Term::blank("r");
    g.add(r.clone(), term(rdf::TYPE), term(owl::RESTRICTION)).unwrap();
    g.add(r.clone(), term(owl::ON_PROPERTY), ex("p")).unwrap();
    g.add(r.clone(), term(owl::HAS_SELF), Term::typed_literal("true", xsd::BOOLEAN))
        .unwrap();

    let dl = OntModel::with_profile(&g, Profile::Owl2Dl);
    let view = dl.resolve_class(&r).expect("self-restriction is an OWL2 DL class");
    assert_eq!(view.role(), EntityRole::HasSelfRestriction);

    let rl = OntModel::with_profile(&g, Profile::Owl2Rl);
    assert!(
        rl.resolve_class(&r).is_err(),
        "the rule-language subset has no self-restriction"
    );
    let owl1 = OntModel::with_profile(&g, Profile::Owl1Dl);
    assert!(owl1.resolve_class(&r).is_err());
}

#[test]
fn union_classes_are_absent_from_restricted_profiles() {
    let mut g = MemoryGraph::new();
    declare(&mut g, "A", owl::CLASS);
    declare(&mut g, "B", owl::CLASS);
    let u = Term::blank("u");
    let l1 = Term::blank("l1");
    let l2 = Term::blank("l2");
    g.add(u.clone(), term(rdf::TYPE), term(owl::CLASS)).unwrap();
    g.add(u.clone(), term(owl::UNION_OF), l1.clone()).unwrap();
    g.add(l1.clone(), term(rdf::FIRST), ex("A")).unwrap();
    g.add(l1, term(rdf::REST), l2.clone()).unwrap();
    g.add(l2.clone(), term(rdf::FIRST), ex("B")).unwrap();
    g.add(l2, term(rdf::REST), term(rdf::NIL)).unwrap();

    let dl = OntModel::with_profile(&g, Profile::Owl2Dl);
    assert_eq!(dl.resolve_class(&u).unwrap().role(), EntityRole::UnionClass);

    for profile in [Profile::Owl1Lite, Profile::Owl2El, Profile::Owl2Ql] {
        let model = OntModel::with_profile(&g, profile);
        assert!(
            model.resolve_class(&u).is_err(),
            "union expressions must not resolve under {profile}"
        );
        assert!(matches!(
            model.resolve(&u, EntityRole::UnionClass),
            Err(OntError::UnsupportedInProfile { .. })
        ));
    }
}

#[test]
fn rdfs_views_generic_properties() {
    let mut g = MemoryGraph::new();
    declare(&mut g, "A", rdfs::CLASS);
    declare(&mut g, "p", rdf::PROPERTY);
    g.add(ex("p"), term(rdfs::DOMAIN), ex("A")).unwrap();

    let model = OntModel::with_profile(&g, Profile::Rdfs);
    let p = model.resolve_property(&ex("p")).unwrap();
    assert_eq!(p.role(), EntityRole::RdfProperty);

    let a = model.resolve_class(&ex("A")).unwrap();
    let declared = model.declared_properties(&a, true);
    assert_eq!(declared, vec![p]);

    let err = model.get_lca(&a, &a).expect_err("no universal class under the schema profile");
    assert!(matches!(err, OntError::UnsupportedInProfile { .. }));
}

#[test]
fn punning_surfaces_as_typed_rejection() {
    let mut g = MemoryGraph::new();
    declare(&mut g, "N", owl::CLASS);
    g.add(ex("N"), term(rdf::TYPE), term(rdfs::DATATYPE)).unwrap();

    let dl = OntModel::with_profile(&g, Profile::Owl2Dl);
    let err = dl.resolve(&ex("N"), EntityRole::NamedClass).unwrap_err();
    match err {
        OntError::PunningConflict { requested, held, .. } => {
            assert_eq!(requested, EntityRole::NamedClass);
            assert_eq!(held, EntityRole::Datatype);
        }
        other => panic!("expected a punning conflict, got {other}"),
    }

    let full = OntModel::with_profile(&g, Profile::Owl2Full);
    assert!(full.resolve(&ex("N"), EntityRole::NamedClass).is_ok());
    assert!(full.resolve(&ex("N"), EntityRole::Datatype).is_ok());
}

#[test]
fn reserved_terms_never_take_entity_roles() {
    let g = MemoryGraph::new();
    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let err = model
        .resolve(&term(owl::ON_PROPERTY), EntityRole::NamedObjectProperty)
        .unwrap_err();
    assert!(matches!(err, OntError::ReservedConflict { .. }));

    // built-ins pass the same gate
    assert!(model.resolve(&term(owl::THING), EntityRole::NamedClass).is_ok());
    assert!(model.resolve(&term(xsd::STRING), EntityRole::Datatype).is_ok());
}

#[test]
fn annotation_wrappers_stay_out_of_results() {
    let mut g = diamond_with_instances();
    let w = Term::blank("w");
    g.add(w.clone(), term(rdf::TYPE), term(owl::AXIOM)).unwrap();
    g.add(w.clone(), term(owl::ANNOTATED_SOURCE), ex("B")).unwrap();
    g.add(w.clone(), term(owl::ANNOTATED_PROPERTY), term(rdfs::SUB_CLASS_OF))
        .unwrap();
    g.add(w.clone(), term(owl::ANNOTATED_TARGET), ex("A")).unwrap();
    g.add(w.clone(), term(rdf::TYPE), ex("C")).unwrap();

    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let c = model.resolve_class(&ex("C")).unwrap();
    assert!(
        !model
            .individuals(&c, false)
            .iter()
            .any(|v| v.term() == &w),
        "bookkeeping nodes are filtered from membership results"
    );
    let wrapper = model.resolve(&w, EntityRole::AnnotationWrapper).unwrap();
    assert_eq!(wrapper.role(), EntityRole::AnnotationWrapper);
}

#[test]
fn disjointness_is_symmetric_and_explicit() {
    let mut g = diamond_with_instances();
    g.add(ex("A"), term(owl::DISJOINT_WITH), ex("D")).unwrap();
    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let a = model.resolve_class(&ex("A")).unwrap();
    let d = model.resolve_class(&ex("D")).unwrap();
    let b = model.resolve_class(&ex("B")).unwrap();
    assert!(model.is_disjoint(&a, &d));
    assert!(model.is_disjoint(&d, &a));
    assert!(!model.is_disjoint(&a, &b));
}

#[test]
fn config_can_come_from_toml() {
    let config = ModelConfig::from_toml_str(
        r#"
        equivalent-class-feature = false
        surface-universal-top = false
        "#,
    )
    .expect("config must parse");
    let mut g = MemoryGraph::new();
    declare(&mut g, "B", owl::CLASS);
    declare(&mut g, "C", owl::CLASS);
    g.add(ex("B"), term(owl::EQUIVALENT_CLASS), ex("C")).unwrap();

    let model = OntModel::new(&g, Specification::with_config(Profile::Owl2Dl, config));
    let b = model.resolve_class(&ex("B")).unwrap();
    assert!(model.super_classes(&b, false).is_empty());
    assert!(model.equivalent_classes(&b).is_empty());
}

#[test]
fn composite_resolution_prefers_specific_roles_everywhere() {
    let mut g = MemoryGraph::new();
    declare(&mut g, "A", owl::CLASS);
    declare(&mut g, "p", owl::OBJECT_PROPERTY);
    let r = Term::blank("r");
    g.add(r.clone(), term(rdf::TYPE), term(owl::RESTRICTION)).unwrap();
    g.add(r.clone(), term(owl::ON_PROPERTY), ex("p")).unwrap();
    g.add(r.clone(), term(owl::ALL_VALUES_FROM), ex("A")).unwrap();
    g.add(ex("A"), term(rdfs::SUB_CLASS_OF), r.clone()).unwrap();

    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let a = model.resolve_class(&ex("A")).unwrap();
    let supers = model.super_classes(&a, true);
    assert_eq!(supers.len(), 1);
    assert_eq!(
        supers[0].role(),
        EntityRole::AllValuesFromRestriction,
        "neighbors resolve as their most specific role"
    );

    let inv = Term::blank("inv");
    g.add(inv.clone(), term(owl::INVERSE_OF), ex("p")).unwrap();
    let model = OntModel::with_profile(&g, Profile::Owl2Dl);
    let view = model.resolve_property(&inv).unwrap();
    assert_eq!(view.role(), EntityRole::InverseObjectProperty);
}

#[test]
fn concurrent_readers_share_one_snapshot() {
    let g = std::sync::Arc::new(diamond_with_instances());
    let mut handles = Vec::new();
    for _ in 0..4 {
        let g = g.clone();
        handles.push(std::thread::spawn(move || {
            let model = OntModel::with_profile(g.as_ref(), Profile::Owl2Dl);
            let c = model.resolve_class(&ex("C")).expect("class must resolve");
            model.super_classes(&c, false).len()
        }));
    }
    for handle in handles {
        assert_eq!(handle.join().expect("reader must not panic"), 5);
    }
}
