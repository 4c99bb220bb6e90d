//! N-Triples parser: the read side of [`crate::emitter::ntriples::NTriplesEmitter`].
//!
//! Accepts one statement per line (`<s> <p> <o> .`), blank lines and `#`
//! comments. Blank nodes and language-tagged literals are rejected since the
//! graph never contains them.

use thiserror::Error;

use crate::model::{Term, Triple};

/// A syntax error on a specific (1-based) line.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct NTriplesError {
    pub line: usize,
    pub message: String,
}

/// Parse a whole N-Triples document.
pub fn parse_document(text: &str) -> Result<Vec<Triple>, NTriplesError> {
    let mut triples = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(triple)) => triples.push(triple),
            Ok(None) => {}
            Err(message) => {
                return Err(NTriplesError {
                    line: idx + 1,
                    message,
                })
            }
        }
    }
    Ok(triples)
}

/// Parse a single line. `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<Triple>, String> {
    let mut cursor = Cursor { src: line, pos: 0 };
    cursor.skip_ws();
    match cursor.peek() {
        None | Some('#') => return Ok(None),
        _ => {}
    }

    let subject = cursor.iri()?;
    cursor.skip_ws();
    let predicate = cursor.iri()?;
    cursor.skip_ws();
    let object = cursor.object()?;
    cursor.skip_ws();
    cursor.expect('.')?;
    cursor.skip_ws();
    match cursor.peek() {
        None | Some('#') => Ok(Some(Triple::new(subject, predicate, object))),
        Some(c) => Err(format!("unexpected '{c}' after statement terminator")),
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, want: char) -> Result<(), String> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(format!("expected '{want}', found '{c}'")),
            None => Err(format!("expected '{want}', found end of line")),
        }
    }

    fn iri(&mut self) -> Result<String, String> {
        match self.peek() {
            Some('<') => {}
            Some('_') => return Err("blank nodes are not supported".to_string()),
            Some(c) => return Err(format!("expected IRI, found '{c}'")),
            None => return Err("expected IRI, found end of line".to_string()),
        }
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('>') => return Ok(out),
                Some('\\') => out.push(self.unicode_escape()?),
                Some(c) if c == ' ' || c == '<' || c == '"' => {
                    return Err(format!("invalid character '{c}' in IRI"))
                }
                Some(c) => out.push(c),
                None => return Err("unterminated IRI".to_string()),
            }
        }
    }

    fn object(&mut self) -> Result<Term, String> {
        if self.peek() != Some('"') {
            return self.iri().map(Term::Iri);
        }
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => value.push(self.literal_escape()?),
                Some(c) => value.push(c),
                None => return Err("unterminated literal".to_string()),
            }
        }
        match self.peek() {
            Some('^') => {
                self.pos += 1;
                self.expect('^')?;
                let datatype = self.iri()?;
                Ok(Term::TypedLiteral { value, datatype })
            }
            Some('@') => Err("language-tagged literals are not supported".to_string()),
            _ => Ok(Term::Literal(value)),
        }
    }

    fn literal_escape(&mut self) -> Result<char, String> {
        match self.peek() {
            Some('u' | 'U') => self.unicode_escape(),
            _ => match self.bump() {
                Some('t') => Ok('\t'),
                Some('b') => Ok('\u{8}'),
                Some('n') => Ok('\n'),
                Some('r') => Ok('\r'),
                Some('f') => Ok('\u{c}'),
                Some('"') => Ok('"'),
                Some('\'') => Ok('\''),
                Some('\\') => Ok('\\'),
                Some(c) => Err(format!("invalid escape '\\{c}'")),
                None => Err("dangling escape".to_string()),
            },
        }
    }

    /// `uXXXX` or `UXXXXXXXX`, with the backslash already consumed.
    fn unicode_escape(&mut self) -> Result<char, String> {
        let digits = match self.bump() {
            Some('u') => 4,
            Some('U') => 8,
            Some(c) => return Err(format!("invalid escape '\\{c}'")),
            None => return Err("dangling escape".to_string()),
        };
        let end = self.pos + digits;
        let hex = self
            .src
            .get(self.pos..end)
            .ok_or_else(|| "truncated unicode escape".to_string())?;
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| format!("invalid unicode escape '{hex}'"))?;
        self.pos = end;
        char::from_u32(code).ok_or_else(|| format!("invalid code point U+{code:X}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_and_blank_lines_are_skipped() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# @prefix doap: <http://usefulinc.com/ns/doap#> ."), Ok(None));
    }

    #[test]
    fn trailing_comment_is_allowed() {
        let triple = parse_line("<http://a> <http://b> <http://c> . # note")
            .unwrap()
            .unwrap();
        assert_eq!(triple, Triple::iri("http://a", "http://b", "http://c"));
    }

    #[test]
    fn unicode_escapes_decode() {
        let triple = parse_line(r#"<http://a> <http://b> "café \U0001F600" ."#)
            .unwrap()
            .unwrap();
        assert_eq!(triple.object, Term::literal("café 😀"));
    }

    #[test]
    fn missing_terminator_is_an_error() {
        assert!(parse_line("<http://a> <http://b> <http://c>").is_err());
    }

    #[test]
    fn blank_nodes_are_rejected() {
        let err = parse_line("_:b0 <http://b> <http://c> .").unwrap_err();
        assert!(err.contains("blank nodes"));
    }

    #[test]
    fn document_error_reports_line_number() {
        let text = "<http://a> <http://b> \"ok\" .\n\n<http://a> <http://b> \"broken .\n";
        let err = parse_document(text).unwrap_err();
        assert_eq!(err.line, 3);
    }
}
