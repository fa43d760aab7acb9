//! Error types for resolution and hierarchy operations.
//!
//! All of these are local, synchronous, non-retryable failures. Traversal
//! algorithms never raise them for graph shapes they merely don't expect:
//! unresolvable nodes are simply absent from query results.

use ontos_graph::Term;

use crate::role::EntityRole;

/// Typed failures surfaced by the resolver and the query surface.
#[derive(Debug, thiserror::Error)]
pub enum OntError {
    /// The node already legitimately holds a role that is mutually
    /// exclusive, under the active profile, with the requested one.
    #[error("punning conflict: {term} cannot present as {requested} while also declared {held}")]
    PunningConflict {
        term: Term,
        requested: EntityRole,
        held: EntityRole,
    },

    /// The node belongs to the profile's reserved vocabulary and cannot
    /// take any non-built-in role.
    #[error("reserved vocabulary conflict: {term} cannot present as {requested}")]
    ReservedConflict { term: Term, requested: EntityRole },

    /// The operation or construct is structurally meaningful but forbidden
    /// by the active logical profile. A programming-contract violation,
    /// not a recoverable runtime condition.
    #[error("not supported in the {profile} profile: {what}")]
    UnsupportedInProfile { what: String, profile: String },

    /// A typed view outlived a mutation of its backing graph. Detected
    /// lazily, on next use.
    #[error("stale view of {term}: resolved at revision {seen}, graph now at {current}")]
    IllegalState { term: Term, seen: u64, current: u64 },

    /// The node does not present as the requested role under the active
    /// profile.
    #[error("{term} is not recognizable as {requested}")]
    NotRecognized { term: Term, requested: String },
}
