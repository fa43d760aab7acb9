//! Typed views: a (node, role) pair handed back by the resolver.
//!
//! Views are not cached identity objects. Re-resolving the same node under
//! the same role yields an equal, interchangeable view — identity is
//! structural, so the revision stamp a view carries for staleness
//! detection takes no part in equality, ordering or hashing.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use ontos_graph::{Graph, Term};

use crate::error::OntError;
use crate::role::EntityRole;

/// A role-specific handle onto a graph node.
#[derive(Debug, Clone)]
pub struct TypedView {
    term: Term,
    role: EntityRole,
    revision: u64,
}

impl TypedView {
    pub(crate) fn new(term: Term, role: EntityRole, revision: u64) -> Self {
        Self {
            term,
            role,
            revision,
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn role(&self) -> EntityRole {
        self.role
    }

    /// The graph revision this view was resolved at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the underlying node is anonymous.
    pub fn is_anon(&self) -> bool {
        self.term.is_blank()
    }

    /// Fail if the backing graph has been edited since resolution.
    ///
    /// Staleness is detected lazily, on use, never eagerly.
    pub fn ensure_current<G: Graph>(&self, graph: &G) -> Result<(), OntError> {
        let current = graph.revision();
        if current != self.revision {
            return Err(OntError::IllegalState {
                term: self.term.clone(),
                seen: self.revision,
                current,
            });
        }
        Ok(())
    }
}

impl PartialEq for TypedView {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term && self.role == other.role
    }
}

impl Eq for TypedView {}

impl PartialOrd for TypedView {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypedView {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.term, self.role).cmp(&(&other.term, other.role))
    }
}

impl Hash for TypedView {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.term.hash(state);
        self.role.hash(state);
    }
}

impl fmt::Display for TypedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as {}", self.term, self.role)
    }
}
