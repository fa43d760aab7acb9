//! The substrate boundary: read access to a triple graph.
//!
//! The ontology layer consumes graphs exclusively through this trait, so
//! any store — in-memory, persistent, or the output graph of a
//! forward-chaining reasoner — can back the typed views. The trait is
//! deliberately minimal: membership, pattern matching, one capability
//! flag, and an edit counter.

use crate::term::Term;
use crate::triple::Triple;

/// Read access to an edge-labeled graph of [`Term`]s.
pub trait Graph {
    /// Whether the exact triple is present.
    fn contains(&self, subject: &Term, predicate: &Term, object: &Term) -> bool;

    /// All triples matching the pattern; `None` positions match anything.
    ///
    /// Results must be duplicate-free and in a deterministic order for a
    /// given graph state.
    fn triples_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Vec<Triple>;

    /// Whether a forward-chaining process has already materialized the
    /// transitive/equivalence closure into this graph.
    ///
    /// Hierarchy queries consult this once per query: when `true`, stored
    /// subsumption edges are authoritative and no closure is recomputed.
    fn is_inference_backed(&self) -> bool {
        false
    }

    /// A counter that increases on every mutation of the graph.
    ///
    /// Typed views capture the revision they were resolved at; a view used
    /// after the graph moved on is detected lazily through this value.
    fn revision(&self) -> u64;

    /// All triples whose subject is `node`.
    ///
    /// This is the reification/annotation lookup boundary: the typing
    /// layer uses it to keep bookkeeping nodes (axiom and annotation
    /// wrappers) out of hierarchy results.
    fn statements_about(&self, node: &Term) -> Vec<Triple> {
        self.triples_matching(Some(node), None, None)
    }

    /// Objects of all `node --predicate--> ?` triples.
    fn objects_of(&self, node: &Term, predicate: &Term) -> Vec<Term> {
        self.triples_matching(Some(node), Some(predicate), None)
            .into_iter()
            .map(|t| t.object)
            .collect()
    }

    /// Subjects of all `? --predicate--> node` triples.
    fn subjects_of(&self, predicate: &Term, object: &Term) -> Vec<Term> {
        self.triples_matching(None, Some(predicate), Some(object))
            .into_iter()
            .map(|t| t.subject)
            .collect()
    }

    /// Whether `node` carries an explicit `rdf:type marker` assertion.
    fn has_type(&self, node: &Term, marker: &Term) -> bool {
        self.contains(node, &crate::vocab::term(crate::vocab::rdf::TYPE), marker)
    }
}
