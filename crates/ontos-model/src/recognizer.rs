//! Recognizers: graph-pattern predicates deciding whether a node presents
//! as a role.
//!
//! Dispatch is a closed tagged enum, never open virtual dispatch — a
//! personality is a data value wiring roles to recognizer variants. All
//! predicates are read-only; none of them mutate the graph.

use ontos_graph::vocab::{self, owl, rdf};
use ontos_graph::{Graph, Term};

/// How a role recognizes candidate nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognizer {
    /// An explicit `rdf:type` assertion to one of the role's canonical
    /// markers.
    DeclaredType {
        markers: Vec<Term>,
        named_only: bool,
    },

    /// A structural shape for composite expressions and other
    /// marker-less constructs.
    Shape(ShapeKind),

    /// An OR-combination: the node may present through any listed
    /// recognizer.
    Any(Vec<Recognizer>),

    /// Only the profile's built-in vocabulary presents as this role;
    /// no graph pattern ever matches.
    BuiltinOnly,
}

/// Structural shapes for marker-less constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// `owl:Restriction` node with `owl:onProperty` and the kind-specific
    /// predicate.
    Restriction(RestrictionShape),

    /// `owl:Class` node carrying the respective set-operation predicate.
    UnionOf,
    IntersectionOf,
    ComplementOf,
    OneOf,

    /// Anonymous node with `owl:inverseOf` pointing at a named property.
    InverseProperty,

    /// `rdf:first`/`rdf:rest` cell (the empty list is a built-in).
    List,

    /// N-ary disjointness containers.
    DisjointClassesBox,
    DisjointPropertiesBox,
    DifferentIndividualsBox,

    /// A node asserted as an instance of something class-like.
    IndividualByType { require_named: bool },

    /// Reified axiom/annotation bookkeeping node.
    AnnotationWrapper,
}

/// The restriction kinds distinguished by the typing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionShape {
    SomeValuesFrom,
    AllValuesFrom,
    HasValue,
    HasSelf,
    MinCardinality,
    MaxCardinality,
    ExactCardinality,
}

impl RestrictionShape {
    /// The predicates whose presence identifies this restriction kind.
    pub fn predicates(&self) -> &'static [&'static str] {
        match self {
            Self::SomeValuesFrom => &[owl::SOME_VALUES_FROM],
            Self::AllValuesFrom => &[owl::ALL_VALUES_FROM],
            Self::HasValue => &[owl::HAS_VALUE],
            Self::HasSelf => &[owl::HAS_SELF],
            Self::MinCardinality => &[owl::MIN_CARDINALITY, owl::MIN_QUALIFIED_CARDINALITY],
            Self::MaxCardinality => &[owl::MAX_CARDINALITY, owl::MAX_QUALIFIED_CARDINALITY],
            Self::ExactCardinality => &[owl::CARDINALITY, owl::QUALIFIED_CARDINALITY],
        }
    }
}

impl Recognizer {
    /// Whether `node` satisfies this recognizer against `graph`.
    pub fn matches<G: Graph>(&self, graph: &G, node: &Term) -> bool {
        match self {
            Self::DeclaredType { markers, named_only } => {
                if *named_only && !node.is_named() {
                    return false;
                }
                node.is_resource() && markers.iter().any(|m| graph.has_type(node, m))
            }
            Self::Shape(shape) => shape.matches(graph, node),
            Self::Any(variants) => variants.iter().any(|r| r.matches(graph, node)),
            Self::BuiltinOnly => false,
        }
    }
}

impl ShapeKind {
    fn matches<G: Graph>(&self, graph: &G, node: &Term) -> bool {
        if !node.is_resource() {
            return false;
        }
        match self {
            Self::Restriction(kind) => {
                node.is_blank()
                    && graph.has_type(node, &vocab::term(owl::RESTRICTION))
                    && !graph.objects_of(node, &vocab::term(owl::ON_PROPERTY)).is_empty()
                    && kind
                        .predicates()
                        .iter()
                        .any(|p| !graph.objects_of(node, &vocab::term(p)).is_empty())
            }
            Self::UnionOf => class_expression(graph, node, owl::UNION_OF),
            Self::IntersectionOf => class_expression(graph, node, owl::INTERSECTION_OF),
            Self::ComplementOf => class_expression(graph, node, owl::COMPLEMENT_OF),
            Self::OneOf => class_expression(graph, node, owl::ONE_OF),
            Self::InverseProperty => {
                node.is_blank()
                    && graph
                        .objects_of(node, &vocab::term(owl::INVERSE_OF))
                        .iter()
                        .any(Term::is_named)
            }
            Self::List => {
                node.is_blank()
                    && !graph.objects_of(node, &vocab::term(rdf::FIRST)).is_empty()
                    && !graph.objects_of(node, &vocab::term(rdf::REST)).is_empty()
            }
            Self::DisjointClassesBox => {
                graph.has_type(node, &vocab::term(owl::ALL_DISJOINT_CLASSES))
                    && !graph.objects_of(node, &vocab::term(owl::MEMBERS)).is_empty()
            }
            Self::DisjointPropertiesBox => {
                graph.has_type(node, &vocab::term(owl::ALL_DISJOINT_PROPERTIES))
                    && !graph.objects_of(node, &vocab::term(owl::MEMBERS)).is_empty()
            }
            Self::DifferentIndividualsBox => {
                graph.has_type(node, &vocab::term(owl::ALL_DIFFERENT))
                    && (!graph.objects_of(node, &vocab::term(owl::MEMBERS)).is_empty()
                        || !graph
                            .objects_of(node, &vocab::term(owl::DISTINCT_MEMBERS))
                            .is_empty())
            }
            Self::IndividualByType { require_named } => {
                if *require_named && !node.is_named() {
                    return false;
                }
                if !require_named && !node.is_blank() {
                    return false;
                }
                if is_annotation_wrapper(graph, node) {
                    return false;
                }
                graph
                    .objects_of(node, &vocab::term(rdf::TYPE))
                    .iter()
                    .any(is_instance_type_object)
            }
            Self::AnnotationWrapper => is_annotation_wrapper(graph, node),
        }
    }
}

fn class_expression<G: Graph>(graph: &G, node: &Term, predicate: &str) -> bool {
    graph.has_type(node, &vocab::term(owl::CLASS))
        && !graph.objects_of(node, &vocab::term(predicate)).is_empty()
}

/// Whether a type-assertion object looks like a class an individual can
/// instantiate, rather than a vocabulary marker.
///
/// `owl:Thing` is the one reserved term individuals may be typed to
/// directly; everything else inside the system namespaces is a
/// declaration marker, not a class membership.
fn is_instance_type_object(object: &Term) -> bool {
    match object {
        Term::Iri(iri) => iri == owl::THING || !vocab::in_reserved_namespace(iri),
        Term::Blank(_) => true,
        Term::Literal { .. } => false,
    }
}

/// Whether `node` is a reified axiom/annotation bookkeeping node.
///
/// These carry the hierarchy statements they annotate and must never be
/// mistaken for ordinary classes or individuals.
pub fn is_annotation_wrapper<G: Graph>(graph: &G, node: &Term) -> bool {
    if !node.is_resource() {
        return false;
    }
    let wrapper_type = graph.has_type(node, &vocab::term(owl::AXIOM))
        || graph.has_type(node, &vocab::term(owl::ANNOTATION));
    wrapper_type
        && graph.statements_about(node).iter().any(|t| {
            t.predicate.as_iri() == Some(owl::ANNOTATED_SOURCE)
                || t.predicate.as_iri() == Some(owl::ANNOTATED_PROPERTY)
                || t.predicate.as_iri() == Some(owl::ANNOTATED_TARGET)
        })
}
