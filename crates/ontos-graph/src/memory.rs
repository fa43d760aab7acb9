//! Canonical in-memory graph.
//!
//! This is the reference substrate for the ontology layer:
//! - deterministic storage and iteration (ordered set of triples)
//! - well-formedness enforced at the insert boundary
//! - a monotone revision counter backing stale-view detection
//!
//! No inference happens here. A store that carries reasoner output can
//! still be represented by constructing it `with_inference_backed(true)`,
//! which only flips the capability flag the hierarchy engine consults.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::store::Graph;
use crate::term::Term;
use crate::triple::Triple;

/// Errors raised while mutating the in-memory graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The subject position cannot hold a literal.
    #[error("literal cannot be a subject: {0}")]
    LiteralSubject(Term),

    /// The predicate position must hold a named node.
    #[error("predicate must be an IRI: {0}")]
    NonIriPredicate(Term),

    /// A named node does not look like an absolute IRI.
    #[error("malformed IRI: {0:?}")]
    MalformedIri(String),
}

fn absolute_iri_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s<>\x22{}|\\^`]*$")
            .expect("absolute IRI regex must compile")
    })
}

fn check_iri(term: &Term) -> Result<(), GraphError> {
    if let Term::Iri(iri) = term
        && !absolute_iri_re().is_match(iri)
    {
        return Err(GraphError::MalformedIri(iri.clone()));
    }
    Ok(())
}

/// Deterministic in-memory triple store.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    triples: BTreeSet<Triple>,
    revision: u64,
    inference_backed: bool,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from fully-materialized triples.
    ///
    /// Duplicates collapse silently; every triple is still validated.
    pub fn from_triples(triples: Vec<Triple>) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for triple in triples {
            graph.insert(triple)?;
        }
        Ok(graph)
    }

    /// Mark (or unmark) this graph as carrying a materialized closure.
    pub fn with_inference_backed(mut self, flag: bool) -> Self {
        self.inference_backed = flag;
        self
    }

    /// Insert one triple. Returns `true` when it was not already present.
    pub fn insert(&mut self, triple: Triple) -> Result<bool, GraphError> {
        if triple.subject.is_literal() {
            return Err(GraphError::LiteralSubject(triple.subject));
        }
        if !triple.predicate.is_named() {
            return Err(GraphError::NonIriPredicate(triple.predicate));
        }
        check_iri(&triple.subject)?;
        check_iri(&triple.predicate)?;
        check_iri(&triple.object)?;

        let added = self.triples.insert(triple);
        if added {
            self.revision += 1;
        }
        Ok(added)
    }

    /// Convenience insert from three terms.
    pub fn add(&mut self, subject: Term, predicate: Term, object: Term) -> Result<bool, GraphError> {
        self.insert(Triple::new(subject, predicate, object))
    }

    /// Remove one triple. Returns `true` when it was present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        let removed = self.triples.remove(triple);
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Total number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the graph holds zero triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate all triples in deterministic order.
    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }
}

impl Graph for MemoryGraph {
    fn contains(&self, subject: &Term, predicate: &Term, object: &Term) -> bool {
        self.triples.contains(&Triple::new(
            subject.clone(),
            predicate.clone(),
            object.clone(),
        ))
    }

    fn triples_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Vec<Triple> {
        self.triples
            .iter()
            .filter(|t| subject.is_none_or(|s| s == &t.subject))
            .filter(|t| predicate.is_none_or(|p| p == &t.predicate))
            .filter(|t| object.is_none_or(|o| o == &t.object))
            .cloned()
            .collect()
    }

    fn is_inference_backed(&self) -> bool {
        self.inference_backed
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{rdf, rdfs, term};

    fn cls(name: &str) -> Term {
        Term::iri(format!("http://example.com/{name}"))
    }

    #[test]
    fn insert_and_match() {
        let mut g = MemoryGraph::new();
        g.add(cls("B"), term(rdfs::SUB_CLASS_OF), cls("A"))
            .expect("triple should insert");
        g.add(cls("C"), term(rdfs::SUB_CLASS_OF), cls("A"))
            .expect("triple should insert");

        assert!(g.contains(&cls("B"), &term(rdfs::SUB_CLASS_OF), &cls("A")));
        let up = g.triples_matching(None, Some(&term(rdfs::SUB_CLASS_OF)), Some(&cls("A")));
        assert_eq!(up.len(), 2);
    }

    #[test]
    fn duplicate_insert_is_idempotent() {
        let mut g = MemoryGraph::new();
        assert!(g.add(cls("B"), term(rdfs::SUB_CLASS_OF), cls("A")).unwrap());
        let rev = g.revision();
        assert!(!g.add(cls("B"), term(rdfs::SUB_CLASS_OF), cls("A")).unwrap());
        assert_eq!(g.revision(), rev, "no-op insert must not bump revision");
    }

    #[test]
    fn revision_tracks_mutations() {
        let mut g = MemoryGraph::new();
        let r0 = g.revision();
        g.add(cls("B"), term(rdf::TYPE), cls("A")).unwrap();
        let r1 = g.revision();
        assert!(r1 > r0);

        g.remove(&Triple::new(cls("B"), term(rdf::TYPE), cls("A")));
        assert!(g.revision() > r1);
    }

    #[test]
    fn rejects_malformed_triples() {
        let mut g = MemoryGraph::new();
        let err = g
            .add(Term::literal("x"), term(rdf::TYPE), cls("A"))
            .expect_err("literal subject must be rejected");
        assert!(matches!(err, GraphError::LiteralSubject(_)));

        let err = g
            .add(cls("B"), Term::blank("p"), cls("A"))
            .expect_err("blank predicate must be rejected");
        assert!(matches!(err, GraphError::NonIriPredicate(_)));

        let err = g
            .add(cls("B"), Term::iri("not an iri"), cls("A"))
            .expect_err("malformed IRI must be rejected");
        assert!(matches!(err, GraphError::MalformedIri(_)));
    }

    #[test]
    fn blank_nodes_are_valid_subjects_and_objects() {
        let mut g = MemoryGraph::new();
        g.add(Term::blank("b0"), term(rdf::TYPE), cls("A"))
            .expect("blank subject should insert");
        g.add(cls("A"), term(rdfs::SUB_CLASS_OF), Term::blank("b1"))
            .expect("blank object should insert");
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn statements_about_returns_subject_statements() {
        let mut g = MemoryGraph::new();
        g.add(cls("B"), term(rdfs::SUB_CLASS_OF), cls("A")).unwrap();
        g.add(cls("A"), term(rdfs::SUB_CLASS_OF), cls("T")).unwrap();

        let about = g.statements_about(&cls("B"));
        assert_eq!(about.len(), 1);
        assert_eq!(about[0].object, cls("A"));
    }
}
