//! RDF terms and triples as stored in the graph.

use std::fmt;

/// The object position of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    Literal(String),
    TypedLiteral { value: String, datatype: String },
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(value.into())
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// The IRI text or literal lexical form, without any syntax.
    pub fn as_str(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Literal(value) => value,
            Term::TypedLiteral { value, .. } => value,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single subject-predicate-object statement.
///
/// Subject and predicate are always IRIs; the graph has no blank nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    /// Triple whose object is an IRI.
    pub fn iri(subject: &str, predicate: &str, object: &str) -> Self {
        Self::new(subject, predicate, Term::iri(object))
    }

    /// Triple whose object is a plain string literal.
    pub fn literal(subject: &str, predicate: &str, value: &str) -> Self {
        Self::new(subject, predicate, Term::literal(value))
    }
}
