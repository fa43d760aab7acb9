//! Personalities: the role registry a profile wires in.
//!
//! A personality maps each entity role to its recognizer, and carries the
//! three special vocabularies:
//!
//! - **built-ins**: fixed well-known nodes (the universal/empty class, the
//!   built-in datatypes and annotation properties) accepted for their role
//!   unconditionally;
//! - **reserved**: namespaces whose terms may not take non-built-in roles;
//! - **punnings**: which role pairs may not legally coexist on one node.
//!
//! Personalities are immutable after construction and safe to share
//! read-only across arbitrary concurrency. Profiles differ only in what
//! gets wired in here; the resolver algorithm is personality-agnostic.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use ontos_graph::Term;
use ontos_graph::vocab::{owl, rdf, rdfs, term, xsd};

use crate::recognizer::{Recognizer, RestrictionShape, ShapeKind};
use crate::role::EntityRole;
use crate::view::TypedView;

/// One registry row: a role plus the pattern recognizing it.
#[derive(Debug, Clone)]
pub struct RoleSpec {
    pub role: EntityRole,
    pub recognizer: Recognizer,
}

impl RoleSpec {
    /// Wrap an admitted node into its typed view.
    pub fn construct(&self, node: &Term, revision: u64) -> TypedView {
        TypedView::new(node.clone(), self.role, revision)
    }
}

/// Fixed well-known nodes, per role.
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    by_role: BTreeMap<EntityRole, BTreeSet<Term>>,
    universal_class: Option<Term>,
    empty_class: Option<Term>,
}

impl Builtins {
    pub fn is_builtin(&self, node: &Term, role: EntityRole) -> bool {
        self.by_role.get(&role).is_some_and(|set| set.contains(node))
    }

    /// The profile's universal top class, if it posits one.
    pub fn universal_class(&self) -> Option<&Term> {
        self.universal_class.as_ref()
    }

    /// The profile's empty (bottom) class, if it posits one.
    pub fn empty_class(&self) -> Option<&Term> {
        self.empty_class.as_ref()
    }

    /// Whether the node is a built-in under any role.
    pub fn contains(&self, node: &Term) -> bool {
        self.by_role.values().any(|set| set.contains(node))
    }
}

/// Namespaces whose terms are withheld from ordinary entity roles.
#[derive(Debug, Clone, Default)]
pub struct Reserved {
    namespaces: Vec<&'static str>,
}

impl Reserved {
    pub fn contains_iri(&self, iri: &str) -> bool {
        self.namespaces.iter().any(|ns| iri.starts_with(ns))
    }

    pub fn contains(&self, node: &Term) -> bool {
        node.as_iri().is_some_and(|iri| self.contains_iri(iri))
    }
}

/// How strictly a profile forbids one node holding several entity roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunningsMode {
    /// No punning restrictions: any role combination is legal.
    Full,
    /// Second-generation description-logic rules: class/datatype and the
    /// three property categories are mutually exclusive.
    Dl2,
    /// First-generation description-logic rules: every named entity
    /// category is exclusive with every other.
    Dl1,
}

/// The table of forbidden role co-occurrences.
#[derive(Debug, Clone, Default)]
pub struct Punnings {
    forbidden: BTreeMap<EntityRole, BTreeSet<EntityRole>>,
}

impl Punnings {
    pub fn from_mode(mode: PunningsMode) -> Self {
        use EntityRole::*;
        let pairs: &[(EntityRole, EntityRole)] = match mode {
            PunningsMode::Full => &[],
            PunningsMode::Dl2 => &[
                (NamedClass, Datatype),
                (NamedObjectProperty, DataProperty),
                (NamedObjectProperty, AnnotationProperty),
                (DataProperty, AnnotationProperty),
            ],
            PunningsMode::Dl1 => &[
                (NamedClass, Datatype),
                (NamedClass, NamedIndividual),
                (NamedClass, NamedObjectProperty),
                (NamedClass, DataProperty),
                (NamedClass, AnnotationProperty),
                (Datatype, NamedIndividual),
                (Datatype, NamedObjectProperty),
                (Datatype, DataProperty),
                (Datatype, AnnotationProperty),
                (NamedIndividual, NamedObjectProperty),
                (NamedIndividual, DataProperty),
                (NamedIndividual, AnnotationProperty),
                (NamedObjectProperty, DataProperty),
                (NamedObjectProperty, AnnotationProperty),
                (DataProperty, AnnotationProperty),
            ],
        };
        let mut forbidden: BTreeMap<EntityRole, BTreeSet<EntityRole>> = BTreeMap::new();
        for (a, b) in pairs {
            forbidden.entry(*a).or_default().insert(*b);
            forbidden.entry(*b).or_default().insert(*a);
        }
        Self { forbidden }
    }

    /// Roles that may not coexist with `role` on the same node.
    pub fn forbidden_for(&self, role: EntityRole) -> impl Iterator<Item = EntityRole> + '_ {
        self.forbidden
            .get(&role)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// An immutable role registry: recognizers plus the three special
/// vocabularies.
#[derive(Debug, Clone)]
pub struct Personality {
    name: &'static str,
    roles: BTreeMap<EntityRole, RoleSpec>,
    builtins: Builtins,
    reserved: Reserved,
    punnings: Punnings,
}

impl Personality {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn spec_for(&self, role: EntityRole) -> Option<&RoleSpec> {
        self.roles.get(&role)
    }

    pub fn supports(&self, role: EntityRole) -> bool {
        self.roles.contains_key(&role)
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn reserved(&self) -> &Reserved {
        &self.reserved
    }

    pub fn punnings(&self) -> &Punnings {
        &self.punnings
    }

    /// Registered roles, in deterministic order.
    pub fn roles(&self) -> impl Iterator<Item = EntityRole> + '_ {
        self.roles.keys().copied()
    }
}

/// Builder assembling a personality row by row.
#[derive(Debug, Default)]
pub struct PersonalityBuilder {
    name: &'static str,
    roles: BTreeMap<EntityRole, RoleSpec>,
    builtins: Builtins,
    reserved: Reserved,
    punnings: Punnings,
}

impl PersonalityBuilder {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn add_role(mut self, role: EntityRole, recognizer: Recognizer) -> Self {
        self.roles.insert(role, RoleSpec { role, recognizer });
        self
    }

    pub fn remove_role(mut self, role: EntityRole) -> Self {
        self.roles.remove(&role);
        self
    }

    pub fn set_builtins(mut self, builtins: Builtins) -> Self {
        self.builtins = builtins;
        self
    }

    pub fn set_reserved(mut self, reserved: Reserved) -> Self {
        self.reserved = reserved;
        self
    }

    pub fn set_punnings(mut self, punnings: Punnings) -> Self {
        self.punnings = punnings;
        self
    }

    pub fn build(self) -> Personality {
        Personality {
            name: self.name,
            roles: self.roles,
            builtins: self.builtins,
            reserved: self.reserved,
            punnings: self.punnings,
        }
    }
}

fn declared(markers: &[&str]) -> Recognizer {
    Recognizer::DeclaredType {
        markers: markers.iter().map(|m| term(m)).collect(),
        named_only: true,
    }
}

fn restriction(kind: RestrictionShape) -> Recognizer {
    Recognizer::Shape(ShapeKind::Restriction(kind))
}

fn builtin_set(role: EntityRole, terms: &[&str]) -> (EntityRole, BTreeSet<Term>) {
    (role, terms.iter().map(|t| term(t)).collect())
}

fn owl_builtins(second_generation: bool) -> Builtins {
    let mut by_role = BTreeMap::new();
    by_role.extend([
        builtin_set(EntityRole::NamedClass, &[owl::THING, owl::NOTHING]),
        builtin_set(EntityRole::Datatype, xsd::BUILTIN_DATATYPES),
        builtin_set(EntityRole::List, &[rdf::NIL]),
        builtin_set(
            EntityRole::AnnotationProperty,
            &[
                rdfs::LABEL,
                rdfs::COMMENT,
                rdfs::SEE_ALSO,
                rdfs::IS_DEFINED_BY,
                owl::VERSION_INFO,
                owl::BACKWARD_COMPATIBLE_WITH,
                owl::INCOMPATIBLE_WITH,
                owl::PRIOR_VERSION,
            ],
        ),
    ]);
    if second_generation {
        by_role.extend([
            builtin_set(
                EntityRole::NamedObjectProperty,
                &[owl::TOP_OBJECT_PROPERTY, owl::BOTTOM_OBJECT_PROPERTY],
            ),
            builtin_set(
                EntityRole::DataProperty,
                &[owl::TOP_DATA_PROPERTY, owl::BOTTOM_DATA_PROPERTY],
            ),
        ]);
        if let Some(set) = by_role.get_mut(&EntityRole::AnnotationProperty) {
            set.insert(term(owl::DEPRECATED));
        }
    }
    Builtins {
        by_role,
        universal_class: Some(term(owl::THING)),
        empty_class: Some(term(owl::NOTHING)),
    }
}

fn rdfs_builtins() -> Builtins {
    let mut by_role = BTreeMap::new();
    by_role.extend([
        builtin_set(EntityRole::Datatype, xsd::BUILTIN_DATATYPES),
        builtin_set(EntityRole::List, &[rdf::NIL]),
        builtin_set(
            EntityRole::AnnotationProperty,
            &[rdfs::LABEL, rdfs::COMMENT, rdfs::SEE_ALSO, rdfs::IS_DEFINED_BY],
        ),
    ]);
    Builtins {
        by_role,
        universal_class: None,
        empty_class: None,
    }
}

fn owl_reserved() -> Reserved {
    Reserved {
        namespaces: vec![rdf::NS, rdfs::NS, owl::NS, xsd::NS],
    }
}

fn rdfs_reserved() -> Reserved {
    Reserved {
        namespaces: vec![rdf::NS, rdfs::NS, xsd::NS],
    }
}

/// Roles shared by every first- and second-generation personality.
fn owl_common(builder: PersonalityBuilder) -> PersonalityBuilder {
    use EntityRole::*;
    builder
        .add_role(NamedClass, declared(&[owl::CLASS]))
        .add_role(Datatype, declared(&[rdfs::DATATYPE]))
        .add_role(NamedObjectProperty, declared(&[owl::OBJECT_PROPERTY]))
        .add_role(DataProperty, declared(&[owl::DATATYPE_PROPERTY]))
        .add_role(AnnotationProperty, declared(&[owl::ANNOTATION_PROPERTY]))
        .add_role(
            InverseObjectProperty,
            Recognizer::Shape(ShapeKind::InverseProperty),
        )
        .add_role(
            AnonymousIndividual,
            Recognizer::Shape(ShapeKind::IndividualByType { require_named: false }),
        )
        .add_role(
            SomeValuesFromRestriction,
            restriction(RestrictionShape::SomeValuesFrom),
        )
        .add_role(
            AllValuesFromRestriction,
            restriction(RestrictionShape::AllValuesFrom),
        )
        .add_role(HasValueRestriction, restriction(RestrictionShape::HasValue))
        .add_role(
            MinCardinalityRestriction,
            restriction(RestrictionShape::MinCardinality),
        )
        .add_role(
            MaxCardinalityRestriction,
            restriction(RestrictionShape::MaxCardinality),
        )
        .add_role(
            ExactCardinalityRestriction,
            restriction(RestrictionShape::ExactCardinality),
        )
        .add_role(UnionClass, Recognizer::Shape(ShapeKind::UnionOf))
        .add_role(IntersectionClass, Recognizer::Shape(ShapeKind::IntersectionOf))
        .add_role(ComplementClass, Recognizer::Shape(ShapeKind::ComplementOf))
        .add_role(EnumerationClass, Recognizer::Shape(ShapeKind::OneOf))
        .add_role(List, Recognizer::Shape(ShapeKind::List))
        .add_role(
            DifferentIndividuals,
            Recognizer::Shape(ShapeKind::DifferentIndividualsBox),
        )
}

fn owl1_template() -> PersonalityBuilder {
    owl_common(PersonalityBuilder::new("OWL1"))
        .add_role(
            EntityRole::NamedIndividual,
            Recognizer::Shape(ShapeKind::IndividualByType { require_named: true }),
        )
        .set_builtins(owl_builtins(false))
        .set_reserved(owl_reserved())
}

fn owl2_template() -> PersonalityBuilder {
    use EntityRole::*;
    owl_common(PersonalityBuilder::new("OWL2"))
        .add_role(
            NamedIndividual,
            Recognizer::Any(vec![
                declared(&[owl::NAMED_INDIVIDUAL]),
                Recognizer::Shape(ShapeKind::IndividualByType { require_named: true }),
            ]),
        )
        .add_role(HasSelfRestriction, restriction(RestrictionShape::HasSelf))
        .add_role(
            DisjointClasses,
            Recognizer::Shape(ShapeKind::DisjointClassesBox),
        )
        .add_role(
            DisjointProperties,
            Recognizer::Shape(ShapeKind::DisjointPropertiesBox),
        )
        .add_role(
            AnnotationWrapper,
            Recognizer::Shape(ShapeKind::AnnotationWrapper),
        )
        .set_builtins(owl_builtins(true))
        .set_reserved(owl_reserved())
}

/// Schema-level personality: named classes, generic properties, and
/// individuals. No class expressions, no punning restrictions.
pub fn rdfs_personality() -> &'static Personality {
    static P: OnceLock<Personality> = OnceLock::new();
    P.get_or_init(|| {
        use EntityRole::*;
        PersonalityBuilder::new("RDFS")
            .add_role(NamedClass, declared(&[rdfs::CLASS]))
            .add_role(RdfProperty, declared(&[rdf::PROPERTY]))
            .add_role(AnnotationProperty, Recognizer::BuiltinOnly)
            .add_role(Datatype, declared(&[rdfs::DATATYPE]))
            .add_role(
                NamedIndividual,
                Recognizer::Shape(ShapeKind::IndividualByType { require_named: true }),
            )
            .add_role(
                AnonymousIndividual,
                Recognizer::Shape(ShapeKind::IndividualByType { require_named: false }),
            )
            .add_role(List, Recognizer::Shape(ShapeKind::List))
            .set_builtins(rdfs_builtins())
            .set_reserved(rdfs_reserved())
            .set_punnings(Punnings::from_mode(PunningsMode::Full))
            .build()
    })
}

pub fn owl1_lite_personality() -> &'static Personality {
    static P: OnceLock<Personality> = OnceLock::new();
    P.get_or_init(|| {
        use EntityRole::*;
        owl1_template()
            .remove_role(UnionClass)
            .remove_role(ComplementClass)
            .remove_role(EnumerationClass)
            .remove_role(HasValueRestriction)
            .set_punnings(Punnings::from_mode(PunningsMode::Dl1))
            .build()
    })
}

pub fn owl1_dl_personality() -> &'static Personality {
    static P: OnceLock<Personality> = OnceLock::new();
    P.get_or_init(|| {
        owl1_template()
            .set_punnings(Punnings::from_mode(PunningsMode::Dl1))
            .build()
    })
}

pub fn owl1_full_personality() -> &'static Personality {
    static P: OnceLock<Personality> = OnceLock::new();
    P.get_or_init(|| {
        owl1_template()
            .set_punnings(Punnings::from_mode(PunningsMode::Full))
            .build()
    })
}

pub fn owl2_el_personality() -> &'static Personality {
    static P: OnceLock<Personality> = OnceLock::new();
    P.get_or_init(|| {
        use EntityRole::*;
        owl2_template()
            .remove_role(UnionClass)
            .remove_role(ComplementClass)
            .remove_role(AllValuesFromRestriction)
            .remove_role(MinCardinalityRestriction)
            .remove_role(MaxCardinalityRestriction)
            .remove_role(ExactCardinalityRestriction)
            .set_punnings(Punnings::from_mode(PunningsMode::Dl2))
            .build()
    })
}

pub fn owl2_ql_personality() -> &'static Personality {
    static P: OnceLock<Personality> = OnceLock::new();
    P.get_or_init(|| {
        use EntityRole::*;
        owl2_template()
            .remove_role(UnionClass)
            .remove_role(EnumerationClass)
            .remove_role(HasValueRestriction)
            .remove_role(HasSelfRestriction)
            .remove_role(MinCardinalityRestriction)
            .remove_role(MaxCardinalityRestriction)
            .remove_role(ExactCardinalityRestriction)
            .set_punnings(Punnings::from_mode(PunningsMode::Dl2))
            .build()
    })
}

pub fn owl2_rl_personality() -> &'static Personality {
    static P: OnceLock<Personality> = OnceLock::new();
    P.get_or_init(|| {
        use EntityRole::*;
        owl2_template()
            .remove_role(HasSelfRestriction)
            .remove_role(MinCardinalityRestriction)
            .remove_role(ExactCardinalityRestriction)
            .set_punnings(Punnings::from_mode(PunningsMode::Dl2))
            .build()
    })
}

pub fn owl2_dl_personality() -> &'static Personality {
    static P: OnceLock<Personality> = OnceLock::new();
    P.get_or_init(|| {
        owl2_template()
            .set_punnings(Punnings::from_mode(PunningsMode::Dl2))
            .build()
    })
}

pub fn owl2_full_personality() -> &'static Personality {
    static P: OnceLock<Personality> = OnceLock::new();
    P.get_or_init(|| {
        owl2_template()
            .set_punnings(Punnings::from_mode(PunningsMode::Full))
            .build()
    })
}
