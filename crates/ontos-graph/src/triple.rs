//! Triples: the labeled edges of the substrate graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::term::Term;

/// One labeled edge: subject --predicate--> object.
///
/// Well-formedness (IRI predicate, non-literal subject) is enforced at the
/// store boundary, not here; a `Triple` is just the value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// A triple pattern: each position either pins a term or matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
}

impl TriplePattern {
    /// The wildcard pattern.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: Term) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_predicate(mut self, predicate: Term) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_object(mut self, object: Term) -> Self {
        self.object = Some(object);
        self
    }

    /// Whether `triple` satisfies every pinned position.
    pub fn matches(&self, triple: &Triple) -> bool {
        fn position(pinned: Option<&Term>, actual: &Term) -> bool {
            pinned.is_none_or(|t| t == actual)
        }
        position(self.subject.as_ref(), &triple.subject)
            && position(self.predicate.as_ref(), &triple.predicate)
            && position(self.object.as_ref(), &triple.object)
    }
}
