pub mod ntriples;
pub mod turtle;

use std::io;

use crate::model::{Term, Triple};

/// Trait for writing RDF triples in different serialization formats.
pub trait TriplesEmitter {
    /// Emit a triple with an IRI object.
    fn emit_iri(&mut self, subject: &str, predicate: &str, object: &str) -> io::Result<()>;
    /// Emit a triple with a plain string literal object.
    fn emit_literal(&mut self, subject: &str, predicate: &str, value: &str) -> io::Result<()>;
    /// Emit a triple with a typed literal object.
    fn emit_typed_literal(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        datatype: &str,
    ) -> io::Result<()>;
    /// Register a namespace prefix (used by Turtle format).
    fn add_prefix(&mut self, prefix: &str, iri: &str) -> io::Result<()>;
    /// Flush any buffered output.
    fn flush(&mut self) -> io::Result<()>;
    /// Return the number of triples emitted so far.
    fn triple_count(&self) -> u64;

    /// Emit a stored triple, dispatching on the kind of its object.
    fn emit(&mut self, triple: &Triple) -> io::Result<()> {
        match &triple.object {
            Term::Iri(iri) => self.emit_iri(&triple.subject, &triple.predicate, iri),
            Term::Literal(value) => self.emit_literal(&triple.subject, &triple.predicate, value),
            Term::TypedLiteral { value, datatype } => {
                self.emit_typed_literal(&triple.subject, &triple.predicate, value, datatype)
            }
        }
    }
}

/// Escape a string for a double-quoted N-Triples / Turtle literal.
pub(crate) fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escape the text of an `<...>` IRI reference.
///
/// Characters N-Triples forbids inside an IRI reference are written as
/// `\uXXXX`, which the reader decodes back.
pub(crate) fn escape_iri(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len());
    for c in iri.chars() {
        match c {
            '\u{0}'..='\u{20}' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out
}
