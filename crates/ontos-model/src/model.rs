//! The ontology model facade: typed views plus hierarchy queries over one
//! graph under one specification.
//!
//! A model borrows its graph and owns only configuration. Construction is
//! cheap; nothing is cached across queries, so an edited graph simply
//! yields fresh answers (and stale typed views fail their next accessor).
//! Listing queries return finite, duplicate-free, deterministically
//! ordered sequences and silently drop unresolvable nodes.

use std::collections::BTreeSet;

use ontos_graph::vocab::{self, owl, rdfs};
use ontos_graph::{Graph, Term};

use crate::error::OntError;
use crate::hierarchy::{Direction, EdgeSpec, QueryCtx};
use crate::personality::Personality;
use crate::profile::{Profile, Specification};
use crate::resolver;
use crate::role::{CompositeRole, EntityRole};
use crate::roots;
use crate::view::TypedView;

/// An ontology view over a borrowed graph.
pub struct OntModel<'g, G: Graph> {
    graph: &'g G,
    specification: Specification,
    personality: &'static Personality,
}

impl<'g, G: Graph> OntModel<'g, G> {
    pub fn new(graph: &'g G, specification: Specification) -> Self {
        let personality = specification.personality();
        Self {
            graph,
            specification,
            personality,
        }
    }

    /// Shorthand for a model with the profile's default configuration.
    pub fn with_profile(graph: &'g G, profile: Profile) -> Self {
        Self::new(graph, Specification::new(profile))
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    pub fn specification(&self) -> &Specification {
        &self.specification
    }

    pub fn profile(&self) -> Profile {
        self.specification.profile
    }

    pub fn personality(&self) -> &'static Personality {
        self.personality
    }

    fn class_ctx(&self) -> QueryCtx<'_, G> {
        QueryCtx::new(
            self.graph,
            self.personality,
            &self.specification.config,
            EdgeSpec::classes(&self.specification.config),
        )
    }

    fn property_ctx(&self) -> QueryCtx<'_, G> {
        QueryCtx::new(
            self.graph,
            self.personality,
            &self.specification.config,
            EdgeSpec::properties(&self.specification.config),
        )
    }

    fn to_views(&self, terms: BTreeSet<Term>, composite: CompositeRole) -> Vec<TypedView> {
        terms
            .iter()
            .filter_map(|t| {
                resolver::resolve_composite(self.graph, self.personality, t, composite).ok()
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // resolution

    /// View `node` under an exact role.
    pub fn resolve(&self, node: &Term, role: EntityRole) -> Result<TypedView, OntError> {
        resolver::resolve(self.graph, self.personality, node, role)
    }

    /// View `node` as its most specific class-expression role.
    pub fn resolve_class(&self, node: &Term) -> Result<TypedView, OntError> {
        resolver::resolve_composite(self.graph, self.personality, node, CompositeRole::AnyClass)
    }

    /// View `node` as its most specific property role.
    pub fn resolve_property(&self, node: &Term) -> Result<TypedView, OntError> {
        resolver::resolve_composite(self.graph, self.personality, node, CompositeRole::AnyProperty)
    }

    /// View `node` as an individual.
    pub fn resolve_individual(&self, node: &Term) -> Result<TypedView, OntError> {
        resolver::resolve_composite(
            self.graph,
            self.personality,
            node,
            CompositeRole::AnyIndividual,
        )
    }

    /// View `node` as a named entity declaration.
    pub fn resolve_entity(&self, node: &Term) -> Result<TypedView, OntError> {
        resolver::resolve_composite(self.graph, self.personality, node, CompositeRole::AnyEntity)
    }

    // ------------------------------------------------------------------
    // the four listing queries

    pub fn super_classes(&self, class: &TypedView, direct: bool) -> Vec<TypedView> {
        if !class.role().is_class_expression() {
            return Vec::new();
        }
        let ctx = self.class_ctx();
        self.to_views(
            ctx.list(class.term(), Direction::Up, direct),
            CompositeRole::AnyClass,
        )
    }

    pub fn sub_classes(&self, class: &TypedView, direct: bool) -> Vec<TypedView> {
        if !class.role().is_class_expression() {
            return Vec::new();
        }
        let ctx = self.class_ctx();
        self.to_views(
            ctx.list(class.term(), Direction::Down, direct),
            CompositeRole::AnyClass,
        )
    }

    pub fn super_properties(&self, property: &TypedView, direct: bool) -> Vec<TypedView> {
        if !property.role().is_property() {
            return Vec::new();
        }
        let ctx = self.property_ctx();
        self.to_views(
            ctx.list(property.term(), Direction::Up, direct),
            CompositeRole::AnyProperty,
        )
    }

    pub fn sub_properties(&self, property: &TypedView, direct: bool) -> Vec<TypedView> {
        if !property.role().is_property() {
            return Vec::new();
        }
        let ctx = self.property_ctx();
        self.to_views(
            ctx.list(property.term(), Direction::Down, direct),
            CompositeRole::AnyProperty,
        )
    }

    pub fn individuals(&self, class: &TypedView, direct: bool) -> Vec<TypedView> {
        if !class.role().is_class_expression() {
            return Vec::new();
        }
        let ctx = self.class_ctx();
        self.to_views(
            ctx.individuals_of(class.term(), direct),
            CompositeRole::AnyIndividual,
        )
    }

    pub fn declared_properties(&self, class: &TypedView, direct: bool) -> Vec<TypedView> {
        if !class.role().is_class_expression() {
            return Vec::new();
        }
        let ctx = self.class_ctx();
        self.to_views(
            ctx.declared_properties_of(class.term(), direct),
            CompositeRole::AnyProperty,
        )
    }

    // ------------------------------------------------------------------
    // boolean specializations: membership in the corresponding listing

    pub fn has_sub_class(&self, class: &TypedView, candidate: &TypedView, direct: bool) -> bool {
        if !class.role().is_class_expression() {
            return false;
        }
        self.class_ctx()
            .relates(class.term(), candidate.term(), Direction::Down, direct)
    }

    pub fn has_ont_class(
        &self,
        individual: &TypedView,
        class: &TypedView,
        direct: bool,
    ) -> bool {
        if !individual.role().is_individual() {
            return false;
        }
        self.class_ctx()
            .has_class(individual.term(), class.term(), direct)
    }

    pub fn has_sub_property(
        &self,
        property: &TypedView,
        candidate: &TypedView,
        direct: bool,
    ) -> bool {
        if !property.role().is_property() {
            return false;
        }
        self.property_ctx()
            .relates(property.term(), candidate.term(), Direction::Down, direct)
    }

    // ------------------------------------------------------------------
    // structural predicates and utilities

    /// Whether the class has no proper superclass besides the universal
    /// one.
    pub fn is_hierarchy_root(&self, class: &TypedView) -> bool {
        class.role().is_class_expression() && self.class_ctx().is_hierarchy_root(class.term())
    }

    /// Explicit pairwise or container-asserted class disjointness.
    pub fn is_disjoint(&self, a: &TypedView, b: &TypedView) -> bool {
        self.class_ctx().is_disjoint(a.term(), b.term())
    }

    /// Classes explicitly asserted equivalent to this one.
    ///
    /// Empty under profiles whose configuration ignores equivalence.
    pub fn equivalent_classes(&self, class: &TypedView) -> Vec<TypedView> {
        if !self.specification.config.equivalent_class_feature
            || !class.role().is_class_expression()
        {
            return Vec::new();
        }
        let eq = vocab::term(owl::EQUIVALENT_CLASS);
        let mut terms: BTreeSet<Term> = BTreeSet::new();
        terms.extend(self.graph.objects_of(class.term(), &eq));
        terms.extend(self.graph.subjects_of(&eq, class.term()));
        terms.remove(class.term());
        self.to_views(terms, CompositeRole::AnyClass)
    }

    /// Named classes at the top fringe of the hierarchy.
    pub fn named_hierarchy_roots(&self) -> Vec<TypedView> {
        let ctx = self.class_ctx();
        self.to_views(roots::named_hierarchy_roots(&ctx), CompositeRole::AnyClass)
    }

    /// The least common ancestor of two classes.
    pub fn get_lca(&self, a: &TypedView, b: &TypedView) -> Result<TypedView, OntError> {
        let ctx = self.class_ctx();
        let lca = roots::get_lca(&ctx, a.term(), b.term())?;
        resolver::resolve_composite(self.graph, self.personality, &lca, CompositeRole::AnyClass)
    }

    // ------------------------------------------------------------------
    // annotation and expression accessors

    /// The first `rdfs:label` literal of the viewed node.
    ///
    /// Fails with `IllegalState` when the view outlived a graph edit.
    pub fn label(&self, view: &TypedView) -> Result<Option<String>, OntError> {
        view.ensure_current(self.graph)?;
        Ok(self.first_literal(view.term(), rdfs::LABEL))
    }

    /// The first `rdfs:comment` literal of the viewed node.
    pub fn comment(&self, view: &TypedView) -> Result<Option<String>, OntError> {
        view.ensure_current(self.graph)?;
        Ok(self.first_literal(view.term(), rdfs::COMMENT))
    }

    fn first_literal(&self, node: &Term, predicate: &str) -> Option<String> {
        self.graph
            .objects_of(node, &vocab::term(predicate))
            .into_iter()
            .find_map(|o| o.as_lexical().map(str::to_string))
    }

    /// The property a restriction view constrains.
    pub fn on_property(&self, restriction: &TypedView) -> Result<TypedView, OntError> {
        if !restriction.role().is_restriction() {
            return Err(OntError::NotRecognized {
                term: restriction.term().clone(),
                requested: "restriction".to_string(),
            });
        }
        restriction.ensure_current(self.graph)?;
        let targets = self
            .graph
            .objects_of(restriction.term(), &vocab::term(owl::ON_PROPERTY));
        for target in &targets {
            if let Ok(view) = resolver::resolve_composite(
                self.graph,
                self.personality,
                target,
                CompositeRole::AnyRelationalProperty,
            ) {
                return Ok(view);
            }
        }
        Err(OntError::NotRecognized {
            term: restriction.term().clone(),
            requested: "restriction property".to_string(),
        })
    }

    /// The operand terms of a composite class expression: the members of
    /// a union/intersection/enumeration, the complemented class, or a
    /// restriction's filler.
    pub fn expression_components(&self, view: &TypedView) -> Result<Vec<Term>, OntError> {
        view.ensure_current(self.graph)?;
        let ctx = self.class_ctx();
        let node = view.term();
        let components: BTreeSet<Term> = match view.role() {
            EntityRole::UnionClass => ctx.list_members(node, owl::UNION_OF),
            EntityRole::IntersectionClass => ctx.list_members(node, owl::INTERSECTION_OF),
            EntityRole::EnumerationClass => ctx.list_members(node, owl::ONE_OF),
            EntityRole::ComplementClass => self
                .graph
                .objects_of(node, &vocab::term(owl::COMPLEMENT_OF))
                .into_iter()
                .collect(),
            EntityRole::SomeValuesFromRestriction => self
                .graph
                .objects_of(node, &vocab::term(owl::SOME_VALUES_FROM))
                .into_iter()
                .collect(),
            EntityRole::AllValuesFromRestriction => self
                .graph
                .objects_of(node, &vocab::term(owl::ALL_VALUES_FROM))
                .into_iter()
                .collect(),
            EntityRole::HasValueRestriction => self
                .graph
                .objects_of(node, &vocab::term(owl::HAS_VALUE))
                .into_iter()
                .collect(),
            other => {
                return Err(OntError::UnsupportedInProfile {
                    what: format!("expression components of a {other}"),
                    profile: self.personality.name().to_string(),
                });
            }
        };
        Ok(components.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontos_graph::MemoryGraph;
    use ontos_graph::vocab::{rdf, term};

    fn ex(name: &str) -> Term {
        Term::iri(format!("http://example.com/{name}"))
    }

    fn chain_graph() -> MemoryGraph {
        let mut g = MemoryGraph::new();
        for name in ["A", "B", "C"] {
            g.add(ex(name), term(rdf::TYPE), term(owl::CLASS)).unwrap();
        }
        g.add(ex("B"), term(rdfs::SUB_CLASS_OF), ex("A")).unwrap();
        g.add(ex("C"), term(rdfs::SUB_CLASS_OF), ex("B")).unwrap();
        g
    }

    #[test]
    fn listing_queries_return_typed_views() {
        let g = chain_graph();
        let model = OntModel::with_profile(&g, Profile::Owl2Dl);
        let c = model.resolve_class(&ex("C")).expect("C is a class");

        let supers = model.super_classes(&c, true);
        assert_eq!(supers.len(), 1);
        assert_eq!(supers[0].term(), &ex("B"));
        assert_eq!(supers[0].role(), EntityRole::NamedClass);
    }

    #[test]
    fn boolean_queries_match_listings() {
        let g = chain_graph();
        let model = OntModel::with_profile(&g, Profile::Owl2Dl);
        let a = model.resolve_class(&ex("A")).unwrap();
        let b = model.resolve_class(&ex("B")).unwrap();
        let c = model.resolve_class(&ex("C")).unwrap();

        for direct in [false, true] {
            for (x, y) in [(&a, &b), (&a, &c), (&b, &c), (&c, &a)] {
                let listed = model
                    .sub_classes(x, direct)
                    .iter()
                    .any(|v| v.term() == y.term());
                assert_eq!(
                    model.has_sub_class(x, y, direct),
                    listed,
                    "boolean/listing consistency"
                );
            }
        }
    }

    #[test]
    fn non_class_views_yield_empty_listings() {
        let mut g = chain_graph();
        g.add(ex("i"), term(rdf::TYPE), ex("C")).unwrap();
        let model = OntModel::with_profile(&g, Profile::Owl2Dl);
        let i = model.resolve_individual(&ex("i")).unwrap();
        assert!(model.super_classes(&i, false).is_empty());
        assert!(model.sub_classes(&i, true).is_empty());
    }

    #[test]
    fn switching_profile_reuses_the_same_graph() {
        let mut g = MemoryGraph::new();
        g.add(ex("A"), term(rdf::TYPE), term(rdfs::CLASS)).unwrap();

        let rdfs_model = OntModel::with_profile(&g, Profile::Rdfs);
        assert!(rdfs_model.resolve_class(&ex("A")).is_ok());

        let owl_model = OntModel::with_profile(&g, Profile::Owl2Dl);
        assert!(
            owl_model.resolve_class(&ex("A")).is_err(),
            "a schema-marker class is not a second-generation class"
        );
    }

    #[test]
    fn resolving_twice_yields_interchangeable_views() {
        let g = chain_graph();
        let model = OntModel::with_profile(&g, Profile::Owl2Dl);
        let first = model.resolve_class(&ex("A")).unwrap();
        let second = model.resolve_class(&ex("A")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn labels_read_through_staleness_check() {
        let mut g = chain_graph();
        g.add(ex("A"), term(rdfs::LABEL), Term::literal("Alpha")).unwrap();
        let model = OntModel::with_profile(&g, Profile::Owl2Dl);
        let a = model.resolve_class(&ex("A")).unwrap();
        assert_eq!(model.label(&a).unwrap(), Some("Alpha".to_string()));
        assert_eq!(model.comment(&a).unwrap(), None);
    }

    #[test]
    fn stale_views_fail_accessors() {
        let mut g = chain_graph();
        let a = {
            let model = OntModel::with_profile(&g, Profile::Owl2Dl);
            model.resolve_class(&ex("A")).unwrap()
        };
        g.add(ex("A"), term(rdfs::LABEL), Term::literal("Alpha")).unwrap();
        let model = OntModel::with_profile(&g, Profile::Owl2Dl);
        let err = model.label(&a).expect_err("stale view must fail");
        assert!(matches!(err, OntError::IllegalState { .. }));
        // re-resolving repairs the handle
        let fresh = model.resolve_class(&ex("A")).unwrap();
        assert_eq!(model.label(&fresh).unwrap(), Some("Alpha".to_string()));
    }

    #[test]
    fn restriction_accessors_expose_property_and_filler() {
        let mut g = chain_graph();
        g.add(ex("p"), term(rdf::TYPE), term(owl::OBJECT_PROPERTY)).unwrap();
        let r = Term::blank("r");
        g.add(r.clone(), term(rdf::TYPE), term(owl::RESTRICTION)).unwrap();
        g.add(r.clone(), term(owl::ON_PROPERTY), ex("p")).unwrap();
        g.add(r.clone(), term(owl::SOME_VALUES_FROM), ex("A")).unwrap();

        let model = OntModel::with_profile(&g, Profile::Owl2Dl);
        let view = model.resolve_class(&r).unwrap();
        assert_eq!(view.role(), EntityRole::SomeValuesFromRestriction);

        let p = model.on_property(&view).unwrap();
        assert_eq!(p.term(), &ex("p"));
        assert_eq!(
            model.expression_components(&view).unwrap(),
            vec![ex("A")]
        );
    }

    #[test]
    fn union_components_walk_the_member_list() {
        let mut g = chain_graph();
        let u = Term::blank("u");
        let l1 = Term::blank("l1");
        let l2 = Term::blank("l2");
        g.add(u.clone(), term(rdf::TYPE), term(owl::CLASS)).unwrap();
        g.add(u.clone(), term(owl::UNION_OF), l1.clone()).unwrap();
        g.add(l1.clone(), term(rdf::FIRST), ex("A")).unwrap();
        g.add(l1, term(rdf::REST), l2.clone()).unwrap();
        g.add(l2.clone(), term(rdf::FIRST), ex("B")).unwrap();
        g.add(l2, term(rdf::REST), term(rdf::NIL)).unwrap();

        let model = OntModel::with_profile(&g, Profile::Owl2Dl);
        let view = model.resolve_class(&u).unwrap();
        assert_eq!(view.role(), EntityRole::UnionClass);
        assert_eq!(
            model.expression_components(&view).unwrap(),
            vec![ex("A"), ex("B")]
        );
    }

    #[test]
    fn equivalent_classes_listing_respects_the_feature_flag() {
        let mut g = MemoryGraph::new();
        g.add(ex("B"), term(rdf::TYPE), term(owl::CLASS)).unwrap();
        g.add(ex("C"), term(rdf::TYPE), term(owl::CLASS)).unwrap();
        g.add(ex("B"), term(owl::EQUIVALENT_CLASS), ex("C")).unwrap();

        let model = OntModel::with_profile(&g, Profile::Owl2Dl);
        let b = model.resolve_class(&ex("B")).unwrap();
        let eq = model.equivalent_classes(&b);
        assert_eq!(eq.len(), 1);
        assert_eq!(eq[0].term(), &ex("C"));
    }
}
