//! The hierarchy reasoner: subsumption, membership and domain attribution.
//!
//! A pure query engine over the substrate graph, with two traversal modes
//! selected once per query by the graph's `is_inference_backed` flag:
//!
//! - **materialized**: stored subsumption edges already contain the
//!   closure and are authoritative; queries read them one hop deep;
//! - **on-demand**: the closure is a visited-set reachability search over
//!   explicit subsumption and equivalence edges.
//!
//! Direct results are always a minimality filter over the indirect set —
//! never a stored relation — which makes Direct ⊆ Indirect true by
//! construction. Equivalence clusters are computed by a single
//! strongly-connected-components pass per query; every member of a
//! cluster tied at the same depth is reported, with no tie-breaking.
//!
//! Unresolvable or bookkeeping neighbors are silently absent from every
//! result: traversal degrades rather than fails on malformed data.

use std::cell::{OnceCell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use ontos_graph::vocab::{self, owl, rdf, rdfs};
use ontos_graph::{Graph, Term};

use crate::cluster::{Clusters, strongly_connected};
use crate::config::{CyclePolicy, ModelConfig};
use crate::personality::Personality;
use crate::recognizer::is_annotation_wrapper;
use crate::resolver::{self, ResolveCtx};
use crate::role::{CompositeRole, EntityRole};

/// Which way a traversal walks the subsumption relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    /// Toward ancestors (super-entities).
    Up,
    /// Toward descendants (sub-entities).
    Down,
}

/// The edge relation one query family walks.
#[derive(Debug, Clone)]
pub(crate) struct EdgeSpec {
    predicate: Term,
    equivalence: Option<Term>,
    neighbor_filter: CompositeRole,
    inject_top: bool,
}

impl EdgeSpec {
    /// Class subsumption: `rdfs:subClassOf` plus class equivalence.
    pub fn classes(config: &ModelConfig) -> Self {
        Self {
            predicate: vocab::term(rdfs::SUB_CLASS_OF),
            equivalence: config
                .equivalent_class_feature
                .then(|| vocab::term(owl::EQUIVALENT_CLASS)),
            neighbor_filter: CompositeRole::AnyClass,
            inject_top: config.surface_universal_top,
        }
    }

    /// Property subsumption: `rdfs:subPropertyOf` plus property
    /// equivalence. No universal ancestor is surfaced for properties.
    pub fn properties(config: &ModelConfig) -> Self {
        Self {
            predicate: vocab::term(rdfs::SUB_PROPERTY_OF),
            equivalence: config
                .equivalent_property_feature
                .then(|| vocab::term(owl::EQUIVALENT_PROPERTY)),
            neighbor_filter: CompositeRole::AnyProperty,
            inject_top: false,
        }
    }
}

/// One logical query over one immutable graph snapshot.
///
/// Holds the query-local memo tables; never shared across threads or kept
/// beyond the operation that created it.
pub(crate) struct QueryCtx<'a, G: Graph> {
    graph: &'a G,
    personality: &'static Personality,
    config: &'a ModelConfig,
    materialized: bool,
    edge: EdgeSpec,
    resolve: RefCell<ResolveCtx>,
    reach_memo: RefCell<HashMap<(Term, Direction), Rc<BTreeSet<Term>>>>,
    indirect_memo: RefCell<HashMap<(Term, Direction), Rc<BTreeSet<Term>>>>,
    clusters: OnceCell<Rc<Clusters>>,
}

impl<'a, G: Graph> QueryCtx<'a, G> {
    pub fn new(
        graph: &'a G,
        personality: &'static Personality,
        config: &'a ModelConfig,
        edge: EdgeSpec,
    ) -> Self {
        Self {
            graph,
            personality,
            config,
            materialized: graph.is_inference_backed(),
            edge,
            resolve: RefCell::new(ResolveCtx::new()),
            reach_memo: RefCell::new(HashMap::new()),
            indirect_memo: RefCell::new(HashMap::new()),
            clusters: OnceCell::new(),
        }
    }

    pub fn personality(&self) -> &'static Personality {
        self.personality
    }

    fn universal_class(&self) -> Option<&Term> {
        self.personality.builtins().universal_class()
    }

    /// Whether `node` may appear in results of this query family.
    fn admits_neighbor(&self, node: &Term) -> bool {
        if !node.is_resource() || is_annotation_wrapper(self.graph, node) {
            return false;
        }
        let mut resolve = self.resolve.borrow_mut();
        resolver::composite_admissible(
            self.graph,
            self.personality,
            &mut resolve,
            node,
            self.edge.neighbor_filter,
        )
    }

    /// Explicit one-hop neighbors along the query's edge relation.
    ///
    /// Equivalence is symmetric, so both assertion directions count when
    /// it participates at all. Materialized graphs are read through the
    /// subsumption predicate alone: their closure already carries
    /// whatever equivalence entailed.
    fn explicit_neighbors(&self, node: &Term, dir: Direction) -> BTreeSet<Term> {
        let mut out: BTreeSet<Term> = BTreeSet::new();
        match dir {
            Direction::Up => out.extend(self.graph.objects_of(node, &self.edge.predicate)),
            Direction::Down => out.extend(self.graph.subjects_of(&self.edge.predicate, node)),
        }
        if !self.materialized
            && let Some(eq) = &self.edge.equivalence
        {
            out.extend(self.graph.objects_of(node, eq));
            out.extend(self.graph.subjects_of(eq, node));
        }
        out.retain(|t| self.admits_neighbor(t));
        out
    }

    /// Everything reachable through one or more explicit edges.
    ///
    /// The start node itself appears in the result only when some cycle
    /// (or explicit self-edge) leads back to it.
    fn reach(&self, node: &Term, dir: Direction) -> Rc<BTreeSet<Term>> {
        let key = (node.clone(), dir);
        if let Some(hit) = self.reach_memo.borrow().get(&key) {
            return hit.clone();
        }
        let mut out: BTreeSet<Term> = BTreeSet::new();
        let mut queue: Vec<Term> = self.explicit_neighbors(node, dir).into_iter().collect();
        while let Some(next) = queue.pop() {
            if !out.insert(next.clone()) {
                continue;
            }
            for further in self.explicit_neighbors(&next, dir) {
                if !out.contains(&further) {
                    queue.push(further);
                }
            }
        }
        let out = Rc::new(out);
        self.reach_memo.borrow_mut().insert(key, out.clone());
        out
    }

    /// The equivalence clusters of the explicit edge relation.
    pub fn clusters(&self) -> Rc<Clusters> {
        self.clusters
            .get_or_init(|| {
                let mut adjacency: BTreeMap<Term, BTreeSet<Term>> = BTreeMap::new();
                for t in self
                    .graph
                    .triples_matching(None, Some(&self.edge.predicate), None)
                {
                    if self.admits_neighbor(&t.subject) && self.admits_neighbor(&t.object) {
                        adjacency.entry(t.subject).or_default().insert(t.object);
                    }
                }
                if let Some(eq) = &self.edge.equivalence {
                    for t in self.graph.triples_matching(None, Some(eq), None) {
                        if self.admits_neighbor(&t.subject) && self.admits_neighbor(&t.object) {
                            adjacency
                                .entry(t.subject.clone())
                                .or_default()
                                .insert(t.object.clone());
                            adjacency.entry(t.object).or_default().insert(t.subject);
                        }
                    }
                }
                Rc::new(strongly_connected(&adjacency))
            })
            .clone()
    }

    /// The indirect (full-closure) relative set of `node`.
    fn indirect(&self, node: &Term, dir: Direction) -> Rc<BTreeSet<Term>> {
        let key = (node.clone(), dir);
        if let Some(hit) = self.indirect_memo.borrow().get(&key) {
            return hit.clone();
        }
        let mut set = if self.materialized {
            // stored edges are the closure; keep them as asserted,
            // self-loops included
            self.explicit_neighbors(node, dir)
        } else {
            let mut set = (*self.reach(node, dir)).clone();
            let explicit_self = self.graph.contains(node, &self.edge.predicate, node);
            let keep_self =
                explicit_self && self.config.cycle_policy == CyclePolicy::AssertedSelf;
            if !keep_self {
                set.remove(node);
            }
            set
        };
        if !self.materialized
            && dir == Direction::Up
            && self.edge.inject_top
            && let Some(top) = self.universal_class()
            && node != top
            && self.admits_subject(node)
        {
            set.insert(top.clone());
        }
        let set = Rc::new(set);
        self.indirect_memo.borrow_mut().insert(key, set.clone());
        set
    }

    /// Whether the queried node itself belongs to this query family.
    fn admits_subject(&self, node: &Term) -> bool {
        self.admits_neighbor(node)
            || self
                .universal_class()
                .is_some_and(|top| top == node)
    }

    /// Whether `candidate` lies in the closure of `node`.
    fn dominates(&self, node: &Term, candidate: &Term, dir: Direction) -> bool {
        self.indirect(node, dir).contains(candidate)
    }

    /// The listing query: relatives of `node`, direct or indirect.
    pub fn list(&self, node: &Term, dir: Direction, direct: bool) -> BTreeSet<Term> {
        if !self.admits_subject(node) {
            return BTreeSet::new();
        }
        let indirect = self.descend_from_top_or_indirect(node, dir);
        if !direct {
            return indirect;
        }

        // direct = minimal elements of the indirect set under the
        // subsumption partial order restricted to that set; the node
        // itself never appears, cluster mates always stand or fall
        // together
        let mut candidates = indirect.clone();
        candidates.remove(node);
        self.minimal_of(&candidates, Some(node), dir)
    }

    /// The minimality filter shared by every direct query.
    ///
    /// `y` survives unless some other member `z` of the set has `y` in
    /// its own closure. Members of one cluster never dominate each other
    /// (ties are all reported), and members of the query node's own
    /// cluster dominate nothing: they sit at distance zero, so the
    /// cluster's immediate ancestors stay direct.
    fn minimal_of(
        &self,
        set: &BTreeSet<Term>,
        base: Option<&Term>,
        dir: Direction,
    ) -> BTreeSet<Term> {
        let clusters = self.clusters();
        set.iter()
            .filter(|y| {
                !set.iter().any(|z| {
                    z != *y
                        && !clusters.same(y, z)
                        && base.is_none_or(|b| !clusters.same(b, z))
                        && self.dominates(z, y, dir)
                })
            })
            .cloned()
            .collect()
    }

    /// Indirect listing, with the dual of top-injection: the universal
    /// class's descendants are every class in the graph.
    fn descend_from_top_or_indirect(&self, node: &Term, dir: Direction) -> BTreeSet<Term> {
        if dir == Direction::Down
            && !self.materialized
            && self.edge.inject_top
            && self.universal_class().is_some_and(|top| top == node)
        {
            let mut all = self.all_classes();
            all.remove(node);
            all.extend((*self.reach(node, dir)).clone());
            return all;
        }
        (*self.indirect(node, dir)).clone()
    }

    /// Membership form of the listing query; behaviorally identical to
    /// `target ∈ list(node, ..)`.
    pub fn relates(&self, node: &Term, target: &Term, dir: Direction, direct: bool) -> bool {
        self.list(node, dir, direct).contains(target)
    }

    /// One-hop parents through the subsumption predicate alone.
    ///
    /// Equivalence is deliberately absent: callers walking a
    /// cluster-collapsed hierarchy account for it through [`Self::clusters`].
    pub fn parents_via_subsumption(&self, node: &Term) -> BTreeSet<Term> {
        self.graph
            .objects_of(node, &self.edge.predicate)
            .into_iter()
            .filter(|t| self.admits_neighbor(t))
            .collect()
    }

    /// Every node of the graph presenting as a class under this profile.
    pub fn all_classes(&self) -> BTreeSet<Term> {
        let mut candidates: BTreeSet<Term> = BTreeSet::new();
        for t in self
            .graph
            .triples_matching(None, Some(&vocab::term(rdf::TYPE)), None)
        {
            candidates.insert(t.subject);
        }
        for predicate in [rdfs::SUB_CLASS_OF, owl::EQUIVALENT_CLASS] {
            for t in self
                .graph
                .triples_matching(None, Some(&vocab::term(predicate)), None)
            {
                candidates.insert(t.subject);
                if t.object.is_resource() {
                    candidates.insert(t.object);
                }
            }
        }
        let mut resolve = self.resolve.borrow_mut();
        candidates
            .into_iter()
            .filter(|node| {
                resolver::composite_admissible(
                    self.graph,
                    self.personality,
                    &mut resolve,
                    node,
                    CompositeRole::AnyClass,
                )
            })
            .collect()
    }

    /// Every node of the graph presenting as an individual.
    pub fn all_individuals(&self) -> BTreeSet<Term> {
        let mut resolve = self.resolve.borrow_mut();
        self.graph
            .triples_matching(None, Some(&vocab::term(rdf::TYPE)), None)
            .into_iter()
            .map(|t| t.subject)
            .filter(|node| {
                resolver::composite_admissible(
                    self.graph,
                    self.personality,
                    &mut resolve,
                    node,
                    CompositeRole::AnyIndividual,
                )
            })
            .collect()
    }

    /// All classes the individual belongs to, asserted or inferable.
    pub fn type_closure(&self, individual: &Term) -> BTreeSet<Term> {
        let mut asserted: BTreeSet<Term> = self
            .graph
            .objects_of(individual, &vocab::term(rdf::TYPE))
            .into_iter()
            .filter(|t| self.admits_neighbor(t) || self.universal_class() == Some(t))
            .collect();
        if self.materialized {
            return asserted;
        }
        let mut closure = BTreeSet::new();
        for class in &asserted {
            closure.extend((*self.indirect(class, Direction::Up)).clone());
        }
        closure.append(&mut asserted);
        closure
    }

    /// The minimal (most specific) classes among the individual's types.
    pub fn minimal_types(&self, individual: &Term) -> BTreeSet<Term> {
        let closure = self.type_closure(individual);
        self.minimal_of(&closure, None, Direction::Up)
    }

    /// Class membership test for one individual.
    pub fn has_class(&self, individual: &Term, class: &Term, direct: bool) -> bool {
        if direct {
            self.minimal_types(individual).contains(class)
        } else {
            self.type_closure(individual).contains(class)
        }
    }

    /// Instances of `class`, direct or including the descendant closure.
    pub fn individuals_of(&self, class: &Term, direct: bool) -> BTreeSet<Term> {
        if !self.admits_subject(class) {
            return BTreeSet::new();
        }
        let mut candidates: BTreeSet<Term> = BTreeSet::new();
        if self.materialized {
            candidates.extend(self.graph.subjects_of(&vocab::term(rdf::TYPE), class));
        } else if self.universal_class().is_some_and(|top| top == class) && self.edge.inject_top {
            candidates = self.all_individuals();
        } else {
            let mut sources = self.clusters().cluster_of(class);
            sources.extend((*self.indirect(class, Direction::Down)).clone());
            for source in sources {
                candidates.extend(self.graph.subjects_of(&vocab::term(rdf::TYPE), &source));
            }
        }
        let mut out = BTreeSet::new();
        for individual in candidates {
            let admissible = {
                let mut resolve = self.resolve.borrow_mut();
                resolver::composite_admissible(
                    self.graph,
                    self.personality,
                    &mut resolve,
                    &individual,
                    CompositeRole::AnyIndividual,
                )
            };
            if !admissible {
                continue;
            }
            if self.has_class(&individual, class, direct) {
                out.insert(individual);
            }
        }
        out
    }

    /// Whether `class` sits at the top of its hierarchy: every direct
    /// proper superclass is the universal class.
    pub fn is_hierarchy_root(&self, class: &Term) -> bool {
        if self.personality.builtins().empty_class() == Some(class) {
            return false;
        }
        let top = self.universal_class();
        self.list(class, Direction::Up, true)
            .iter()
            .all(|s| Some(s) == top || s == class)
    }

    /// Properties whose domain attributes them to `class`.
    ///
    /// A property with no domain (or only universal domains) is global:
    /// it attaches to every class indirectly and to hierarchy roots
    /// directly. A domain equal to the class is the direct case; a domain
    /// among the class's ancestors is inherited.
    pub fn declared_properties_of(&self, class: &Term, direct: bool) -> BTreeSet<Term> {
        if !self.admits_subject(class) {
            return BTreeSet::new();
        }
        self.candidate_properties()
            .into_iter()
            .filter(|p| self.tests_domain(class, p, direct))
            .collect()
    }

    fn candidate_properties(&self) -> BTreeSet<Term> {
        let markers: &[(&str, EntityRole)] = if self.personality.supports(EntityRole::RdfProperty)
        {
            &[(rdf::PROPERTY, EntityRole::RdfProperty)]
        } else {
            &[
                (owl::OBJECT_PROPERTY, EntityRole::NamedObjectProperty),
                (owl::DATATYPE_PROPERTY, EntityRole::DataProperty),
                (owl::ANNOTATION_PROPERTY, EntityRole::AnnotationProperty),
            ]
        };
        let mut out = BTreeSet::new();
        let mut resolve = self.resolve.borrow_mut();
        for (marker, role) in markers {
            for subject in self
                .graph
                .subjects_of(&vocab::term(rdf::TYPE), &vocab::term(marker))
            {
                // reserved and built-in properties never count as declared
                if self.personality.reserved().contains(&subject)
                    || self.personality.builtins().contains(&subject)
                {
                    continue;
                }
                if resolver::admissible(
                    self.graph,
                    self.personality,
                    &mut resolve,
                    &subject,
                    *role,
                ) {
                    out.insert(subject);
                }
            }
        }
        out
    }

    fn tests_domain(&self, class: &Term, property: &Term, direct: bool) -> bool {
        let domains = self.graph.objects_of(property, &vocab::term(rdfs::DOMAIN));
        let top = self.universal_class();
        let clusters = self.clusters();
        let ancestors = self.indirect(class, Direction::Up);
        let mut is_global = true;
        let mut seen_direct = false;
        for domain in &domains {
            if Some(domain) == top || domain.as_iri() == Some(rdfs::RESOURCE) {
                // universal domains carry no information
                continue;
            }
            is_global = false;
            if domain == class || clusters.same(domain, class) {
                seen_direct = true;
            } else if !ancestors.contains(domain) {
                // a domain unrelated to this class: not declared here
                return false;
            }
        }
        if direct {
            seen_direct || (is_global && self.is_hierarchy_root(class))
        } else {
            true
        }
    }

    /// Explicit pairwise or container-based disjointness.
    pub fn is_disjoint(&self, a: &Term, b: &Term) -> bool {
        let disjoint_with = vocab::term(owl::DISJOINT_WITH);
        if self.graph.contains(a, &disjoint_with, b) || self.graph.contains(b, &disjoint_with, a)
        {
            return true;
        }
        for container in self
            .graph
            .subjects_of(&vocab::term(rdf::TYPE), &vocab::term(owl::ALL_DISJOINT_CLASSES))
        {
            let members = self.list_members(&container, owl::MEMBERS);
            if members.contains(a) && members.contains(b) {
                return true;
            }
        }
        false
    }

    /// Walk an `rdf:first`/`rdf:rest` chain hanging off `node`.
    pub fn list_members(&self, node: &Term, predicate: &str) -> BTreeSet<Term> {
        let mut out = BTreeSet::new();
        let mut visited = BTreeSet::new();
        let mut cells: Vec<Term> = self.graph.objects_of(node, &vocab::term(predicate));
        while let Some(cell) = cells.pop() {
            if cell.as_iri() == Some(rdf::NIL) || !visited.insert(cell.clone()) {
                continue;
            }
            out.extend(self.graph.objects_of(&cell, &vocab::term(rdf::FIRST)));
            cells.extend(self.graph.objects_of(&cell, &vocab::term(rdf::REST)));
        }
        out
    }
}
