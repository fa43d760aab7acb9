//! Terms: the vertex and label values of the substrate graph.
//!
//! A term is either a named (IRI) node, an anonymous (blank) node, or a
//! literal value. This layer assigns no ontology meaning to any of them —
//! identity and ordering are purely structural, so the same term value
//! observed twice is the same graph node.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vocab::xsd;

/// A single vertex or edge-label value in the substrate graph.
///
/// Terms are plain values: cloning or re-reading one yields an equal,
/// interchangeable handle. Nothing here is tied to a particular graph
/// instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// A named node, identified by an absolute IRI.
    Iri(String),

    /// An anonymous node, identified by a graph-scoped label.
    Blank(String),

    /// A literal value with a lexical form, a datatype IRI and an
    /// optional language tag.
    Literal {
        lexical: String,
        datatype: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },
}

impl Term {
    /// A named node.
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// An anonymous node with the given label.
    pub fn blank(label: impl Into<String>) -> Self {
        Self::Blank(label.into())
    }

    /// A plain string literal (`xsd:string`).
    pub fn literal(lexical: impl Into<String>) -> Self {
        Self::Literal {
            lexical: lexical.into(),
            datatype: xsd::STRING.to_string(),
            lang: None,
        }
    }

    /// A literal with an explicit datatype IRI.
    pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            lexical: lexical.into(),
            datatype: datatype.into(),
            lang: None,
        }
    }

    /// Whether this term is a named (IRI) node.
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Iri(_))
    }

    /// Whether this term is an anonymous (blank) node.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    /// Whether this term is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// Whether this term can stand as a graph node (named or anonymous).
    pub fn is_resource(&self) -> bool {
        !self.is_literal()
    }

    /// The IRI of a named node, if this is one.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The lexical form of a literal, if this is one.
    pub fn as_lexical(&self) -> Option<&str> {
        match self {
            Self::Literal { lexical, .. } => Some(lexical),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal {
                lexical,
                datatype,
                lang,
            } => match lang {
                Some(tag) => write!(f, "{lexical:?}@{tag}"),
                None if datatype == xsd::STRING => write!(f, "{lexical:?}"),
                None => write!(f, "{lexical:?}^^<{datatype}>"),
            },
        }
    }
}
