use std::io::{self, Write};

use super::{escape_iri, escape_literal, TriplesEmitter};

/// N-Triples format emitter. Streams triples as `<s> <p> <o> .` lines.
///
/// This is the on-disk snapshot format; [`crate::store::ntriples`] parses it back.
pub struct NTriplesEmitter<W: Write> {
    writer: W,
    count: u64,
}

impl<W: Write> NTriplesEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, count: 0 }
    }
}

impl<W: Write> TriplesEmitter for NTriplesEmitter<W> {
    fn emit_iri(&mut self, subject: &str, predicate: &str, object: &str) -> io::Result<()> {
        let (s, p, o) = (escape_iri(subject), escape_iri(predicate), escape_iri(object));
        writeln!(self.writer, "<{s}> <{p}> <{o}> .")?;
        self.count += 1;
        Ok(())
    }

    fn emit_literal(&mut self, subject: &str, predicate: &str, value: &str) -> io::Result<()> {
        let (s, p) = (escape_iri(subject), escape_iri(predicate));
        let escaped = escape_literal(value);
        writeln!(self.writer, "<{s}> <{p}> \"{escaped}\" .")?;
        self.count += 1;
        Ok(())
    }

    fn emit_typed_literal(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        datatype: &str,
    ) -> io::Result<()> {
        let (s, p) = (escape_iri(subject), escape_iri(predicate));
        let escaped = escape_literal(value);
        let datatype = escape_iri(datatype);
        writeln!(self.writer, "<{s}> <{p}> \"{escaped}\"^^<{datatype}> .")?;
        self.count += 1;
        Ok(())
    }

    fn add_prefix(&mut self, prefix: &str, iri: &str) -> io::Result<()> {
        // N-Triples doesn't use prefixes, but emit as comment for readability
        writeln!(self.writer, "# @prefix {prefix}: <{iri}> .")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn triple_count(&self) -> u64 {
        self.count
    }
}
