//! Entity roles: the closed set of ways a graph node may present.
//!
//! Roles form a shallow capability lattice expressed as predicate methods:
//! every named object property is also a relational property and a
//! property, every restriction is also a class expression, and so on.
//! Which roles are actually available — and how nodes are recognized as
//! holding them — is decided by the active personality, not here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive entity role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EntityRole {
    // named entities
    NamedClass,
    Datatype,
    NamedIndividual,
    NamedObjectProperty,
    DataProperty,
    AnnotationProperty,
    /// The generic property role. Primitive only under the schema-level
    /// profile, where properties are not split into object/data/annotation.
    RdfProperty,

    // anonymous entities
    AnonymousIndividual,
    InverseObjectProperty,

    // class expressions
    SomeValuesFromRestriction,
    AllValuesFromRestriction,
    HasValueRestriction,
    HasSelfRestriction,
    MinCardinalityRestriction,
    MaxCardinalityRestriction,
    ExactCardinalityRestriction,
    UnionClass,
    IntersectionClass,
    ComplementClass,
    EnumerationClass,

    // collections and bookkeeping
    List,
    DisjointClasses,
    DisjointProperties,
    DifferentIndividuals,
    AnnotationWrapper,
}

impl EntityRole {
    /// Every primitive role, in declaration order.
    pub const ALL: &'static [EntityRole] = &[
        Self::NamedClass,
        Self::Datatype,
        Self::NamedIndividual,
        Self::NamedObjectProperty,
        Self::DataProperty,
        Self::AnnotationProperty,
        Self::RdfProperty,
        Self::AnonymousIndividual,
        Self::InverseObjectProperty,
        Self::SomeValuesFromRestriction,
        Self::AllValuesFromRestriction,
        Self::HasValueRestriction,
        Self::HasSelfRestriction,
        Self::MinCardinalityRestriction,
        Self::MaxCardinalityRestriction,
        Self::ExactCardinalityRestriction,
        Self::UnionClass,
        Self::IntersectionClass,
        Self::ComplementClass,
        Self::EnumerationClass,
        Self::List,
        Self::DisjointClasses,
        Self::DisjointProperties,
        Self::DifferentIndividuals,
        Self::AnnotationWrapper,
    ];

    /// Whether the role is a restriction-kind class expression.
    pub fn is_restriction(&self) -> bool {
        matches!(
            self,
            Self::SomeValuesFromRestriction
                | Self::AllValuesFromRestriction
                | Self::HasValueRestriction
                | Self::HasSelfRestriction
                | Self::MinCardinalityRestriction
                | Self::MaxCardinalityRestriction
                | Self::ExactCardinalityRestriction
        )
    }

    /// Whether the role is some kind of class expression (named classes
    /// included).
    pub fn is_class_expression(&self) -> bool {
        self.is_restriction()
            || matches!(
                self,
                Self::NamedClass
                    | Self::UnionClass
                    | Self::IntersectionClass
                    | Self::ComplementClass
                    | Self::EnumerationClass
            )
    }

    /// Whether the role is some kind of property.
    pub fn is_property(&self) -> bool {
        matches!(
            self,
            Self::NamedObjectProperty
                | Self::DataProperty
                | Self::AnnotationProperty
                | Self::RdfProperty
                | Self::InverseObjectProperty
        )
    }

    /// Whether the role is a relational (object or data) property — the
    /// kind that can participate in restrictions and domain declarations.
    pub fn is_relational_property(&self) -> bool {
        matches!(
            self,
            Self::NamedObjectProperty | Self::DataProperty | Self::InverseObjectProperty
        )
    }

    /// Whether the role is some kind of individual.
    pub fn is_individual(&self) -> bool {
        matches!(self, Self::NamedIndividual | Self::AnonymousIndividual)
    }

    /// Whether the role is one of the named entity declarations.
    pub fn is_named_entity(&self) -> bool {
        matches!(
            self,
            Self::NamedClass
                | Self::Datatype
                | Self::NamedIndividual
                | Self::NamedObjectProperty
                | Self::DataProperty
                | Self::AnnotationProperty
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NamedClass => "named-class",
            Self::Datatype => "datatype",
            Self::NamedIndividual => "named-individual",
            Self::NamedObjectProperty => "named-object-property",
            Self::DataProperty => "data-property",
            Self::AnnotationProperty => "annotation-property",
            Self::RdfProperty => "rdf-property",
            Self::AnonymousIndividual => "anonymous-individual",
            Self::InverseObjectProperty => "inverse-object-property",
            Self::SomeValuesFromRestriction => "some-values-from-restriction",
            Self::AllValuesFromRestriction => "all-values-from-restriction",
            Self::HasValueRestriction => "has-value-restriction",
            Self::HasSelfRestriction => "has-self-restriction",
            Self::MinCardinalityRestriction => "min-cardinality-restriction",
            Self::MaxCardinalityRestriction => "max-cardinality-restriction",
            Self::ExactCardinalityRestriction => "exact-cardinality-restriction",
            Self::UnionClass => "union-class",
            Self::IntersectionClass => "intersection-class",
            Self::ComplementClass => "complement-class",
            Self::EnumerationClass => "enumeration-class",
            Self::List => "list",
            Self::DisjointClasses => "disjoint-classes",
            Self::DisjointProperties => "disjoint-properties",
            Self::DifferentIndividuals => "different-individuals",
            Self::AnnotationWrapper => "annotation-wrapper",
        }
    }
}

impl fmt::Display for EntityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A composite role: an OR-combination of primitive recognizers.
///
/// Resolving a composite attempts each primitive variant in
/// most-specific-first order and reports the first match, so a
/// restriction resolves as its specific restriction kind rather than
/// merely "class".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeRole {
    AnyClass,
    AnyRestriction,
    AnyProperty,
    AnyRelationalProperty,
    AnyIndividual,
    AnyEntity,
}

impl CompositeRole {
    /// Primitive variants, most specific first. Variants absent from the
    /// active personality are skipped at resolution time.
    pub fn candidates(&self) -> &'static [EntityRole] {
        use EntityRole::*;
        match self {
            Self::AnyClass => &[
                SomeValuesFromRestriction,
                AllValuesFromRestriction,
                HasValueRestriction,
                HasSelfRestriction,
                MinCardinalityRestriction,
                MaxCardinalityRestriction,
                ExactCardinalityRestriction,
                UnionClass,
                IntersectionClass,
                ComplementClass,
                EnumerationClass,
                NamedClass,
            ],
            Self::AnyRestriction => &[
                SomeValuesFromRestriction,
                AllValuesFromRestriction,
                HasValueRestriction,
                HasSelfRestriction,
                MinCardinalityRestriction,
                MaxCardinalityRestriction,
                ExactCardinalityRestriction,
            ],
            Self::AnyProperty => &[
                NamedObjectProperty,
                DataProperty,
                AnnotationProperty,
                InverseObjectProperty,
                RdfProperty,
            ],
            Self::AnyRelationalProperty => {
                &[NamedObjectProperty, DataProperty, InverseObjectProperty]
            }
            Self::AnyIndividual => &[NamedIndividual, AnonymousIndividual],
            Self::AnyEntity => &[
                NamedClass,
                Datatype,
                NamedIndividual,
                NamedObjectProperty,
                DataProperty,
                AnnotationProperty,
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnyClass => "any-class",
            Self::AnyRestriction => "any-restriction",
            Self::AnyProperty => "any-property",
            Self::AnyRelationalProperty => "any-relational-property",
            Self::AnyIndividual => "any-individual",
            Self::AnyEntity => "any-entity",
        }
    }
}

impl fmt::Display for CompositeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_is_consistent() {
        for role in EntityRole::ALL {
            if role.is_restriction() {
                assert!(role.is_class_expression(), "{role} must be a class expression");
            }
            if role.is_relational_property() {
                assert!(role.is_property(), "{role} must be a property");
            }
        }
    }

    #[test]
    fn composite_candidates_stay_in_lattice() {
        for role in CompositeRole::AnyClass.candidates() {
            assert!(role.is_class_expression());
        }
        for role in CompositeRole::AnyProperty.candidates() {
            assert!(role.is_property());
        }
        for role in CompositeRole::AnyIndividual.candidates() {
            assert!(role.is_individual());
        }
    }

    #[test]
    fn restriction_resolves_more_specific_than_named_class() {
        let candidates = CompositeRole::AnyClass.candidates();
        let restriction = candidates
            .iter()
            .position(|r| *r == EntityRole::SomeValuesFromRestriction)
            .expect("restriction must be a class candidate");
        let named = candidates
            .iter()
            .position(|r| *r == EntityRole::NamedClass)
            .expect("named class must be a class candidate");
        assert!(restriction < named);
    }

    #[test]
    fn role_serde_round_trip() {
        let json = serde_json::to_string(&EntityRole::SomeValuesFromRestriction).unwrap();
        assert_eq!(json, "\"some-values-from-restriction\"");
        let back: EntityRole = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EntityRole::SomeValuesFromRestriction);
    }
}
