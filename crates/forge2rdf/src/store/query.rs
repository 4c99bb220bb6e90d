//! A small declarative query language over [`TripleStore`].
//!
//! Supported subset:
//!
//! ```text
//! PREFIX doap: <http://usefulinc.com/ns/doap#>
//! SELECT * | SELECT ?a ?b
//! WHERE {
//!   ?project a doap:Project .
//!   ?project doap:name ?name .
//!   OPTIONAL { ?project xkos:hasPart ?part . ?part doap:name ?partName }
//! }
//! ORDER BY ?project
//! ```
//!
//! Triple patterns in a group are joined on shared variables. An `OPTIONAL`
//! group is a left join: a solution it cannot extend is kept with the
//! group's variables unbound. All prefixes from [`ontology::PREFIXES`] are
//! pre-registered.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use thiserror::Error;

use crate::model::ontology::{self, standard};
use crate::model::Term;

use super::TripleStore;

// ---------------------------------------------------------------------------
// Query model
// ---------------------------------------------------------------------------

/// One position of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTerm {
    Var(String),
    Const(Term),
}

impl PatternTerm {
    pub fn var(name: &str) -> Self {
        PatternTerm::Var(name.to_string())
    }

    pub fn iri(iri: &str) -> Self {
        PatternTerm::Const(Term::iri(iri))
    }

    pub fn literal(value: &str) -> Self {
        PatternTerm::Const(Term::literal(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupElement {
    Triple(TriplePattern),
    Optional(GroupPattern),
}

/// A `{ ... }` block, evaluated left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupPattern {
    pub elements: Vec<GroupElement>,
}

impl GroupPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triple(mut self, subject: PatternTerm, predicate: PatternTerm, object: PatternTerm) -> Self {
        self.elements.push(GroupElement::Triple(TriplePattern {
            subject,
            predicate,
            object,
        }));
        self
    }

    pub fn optional(mut self, group: GroupPattern) -> Self {
        self.elements.push(GroupElement::Optional(group));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    All,
    Vars(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub projection: Projection,
    pub pattern: GroupPattern,
    pub order_by: Vec<String>,
}

impl Query {
    /// `SELECT *` over `pattern`, unordered.
    pub fn select_all(pattern: GroupPattern) -> Self {
        Self {
            projection: Projection::All,
            pattern,
            order_by: Vec::new(),
        }
    }

    pub fn order_by(mut self, var: &str) -> Self {
        self.order_by.push(var.to_string());
        self
    }

    pub fn parse(text: &str) -> Result<Self, QueryParseError> {
        Parser::new(text)?.query()
    }
}

impl FromStr for Query {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Solutions
// ---------------------------------------------------------------------------

/// One row of query results: variable name to bound term.
///
/// A variable that is absent is unbound (e.g. inside an unmatched OPTIONAL).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    bindings: BTreeMap<String, Term>,
}

impl Solution {
    pub fn get(&self, var: &str) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Lexical value of a binding, or `None` when unbound.
    pub fn value(&self, var: &str) -> Option<&str> {
        self.get(var).map(Term::as_str)
    }

    pub fn is_bound(&self, var: &str) -> bool {
        self.bindings.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Bind `var` to `term`, failing if it is already bound to something else.
    fn bind(&mut self, var: &str, term: &Term) -> bool {
        match self.bindings.get(var) {
            Some(existing) => existing == term,
            None => {
                self.bindings.insert(var.to_string(), term.clone());
                true
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

pub(crate) fn execute(store: &TripleStore, query: &Query) -> Vec<Solution> {
    let mut solutions = eval_group(store, &query.pattern, vec![Solution::default()]);

    if !query.order_by.is_empty() {
        // Stable: ties keep store order. Unbound sorts before any bound term.
        solutions.sort_by(|a, b| {
            query
                .order_by
                .iter()
                .map(|var| a.get(var).cmp(&b.get(var)))
                .find(|ord| ord.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    if let Projection::Vars(vars) = &query.projection {
        for solution in &mut solutions {
            solution.bindings.retain(|k, _| vars.contains(k));
        }
    }
    solutions
}

fn eval_group(store: &TripleStore, group: &GroupPattern, input: Vec<Solution>) -> Vec<Solution> {
    let mut solutions = input;
    for element in &group.elements {
        solutions = match element {
            GroupElement::Triple(pattern) => solutions
                .iter()
                .flat_map(|s| match_pattern(store, pattern, s))
                .collect(),
            GroupElement::Optional(inner) => {
                let mut out = Vec::with_capacity(solutions.len());
                for solution in solutions {
                    let extended = eval_group(store, inner, vec![solution.clone()]);
                    if extended.is_empty() {
                        out.push(solution);
                    } else {
                        out.extend(extended);
                    }
                }
                out
            }
        };
        if solutions.is_empty() {
            break;
        }
    }
    solutions
}

/// The constant a pattern position resolves to under `solution`, if any.
fn resolve<'a>(term: &'a PatternTerm, solution: &'a Solution) -> Option<&'a Term> {
    match term {
        PatternTerm::Const(t) => Some(t),
        PatternTerm::Var(v) => solution.get(v),
    }
}

fn match_pattern(store: &TripleStore, pattern: &TriplePattern, solution: &Solution) -> Vec<Solution> {
    let subject = resolve(&pattern.subject, solution);
    let predicate = resolve(&pattern.predicate, solution);
    let object = resolve(&pattern.object, solution);

    // Subjects and predicates are always IRIs; a literal there matches nothing.
    if subject.is_some_and(|t| !t.is_iri()) || predicate.is_some_and(|t| !t.is_iri()) {
        return Vec::new();
    }

    store
        .matching(
            subject.map(Term::as_str),
            predicate.map(Term::as_str),
            object,
        )
        .filter_map(|triple| {
            let mut row = solution.clone();
            let positions = [
                (&pattern.subject, Term::iri(triple.subject.as_str())),
                (&pattern.predicate, Term::iri(triple.predicate.as_str())),
                (&pattern.object, triple.object.clone()),
            ];
            for (position, value) in &positions {
                if let PatternTerm::Var(var) = position {
                    if !row.bind(var, value) {
                        return None;
                    }
                }
            }
            Some(row)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
#[error("query parse error at offset {offset}: {message}")]
pub struct QueryParseError {
    pub offset: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Bare word: keyword, `a`, or prefixed name like `doap:name` / `doap:`.
    Word(String),
    Var(String),
    Iri(String),
    Literal(String),
    LBrace,
    RBrace,
    Dot,
    Star,
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, QueryParseError> {
    let err = |offset: usize, message: &str| QueryParseError {
        offset,
        message: message.to_string(),
    };
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while chars.next_if(|&(_, c)| c != '\n').is_some() {}
            }
            '{' | '}' | '.' | '*' => {
                chars.next();
                let token = match c {
                    '{' => Token::LBrace,
                    '}' => Token::RBrace,
                    '.' => Token::Dot,
                    _ => Token::Star,
                };
                tokens.push((start, token));
            }
            '<' => {
                chars.next();
                let mut iri = String::new();
                loop {
                    match chars.next() {
                        Some((_, '>')) => break,
                        Some((_, c)) if c.is_whitespace() => {
                            return Err(err(start, "whitespace in IRI"))
                        }
                        Some((_, c)) => iri.push(c),
                        None => return Err(err(start, "unterminated IRI")),
                    }
                }
                tokens.push((start, Token::Iri(iri)));
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((pos, '\\')) => match chars.next() {
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, 'r')) => value.push('\r'),
                            Some((_, c @ ('"' | '\\' | '\''))) => value.push(c),
                            _ => return Err(err(pos, "invalid escape in literal")),
                        },
                        Some((_, c)) => value.push(c),
                        None => return Err(err(start, "unterminated literal")),
                    }
                }
                tokens.push((start, Token::Literal(value)));
            }
            '?' | '$' => {
                chars.next();
                let mut name = String::new();
                while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_alphanumeric() || c == '_') {
                    name.push(c);
                }
                if name.is_empty() {
                    return Err(err(start, "empty variable name"));
                }
                tokens.push((start, Token::Var(name)));
            }
            c if c.is_alphanumeric() || c == '_' || c == ':' => {
                let mut word = String::new();
                while let Some((_, c)) =
                    chars.next_if(|&(_, c)| c.is_alphanumeric() || matches!(c, '_' | '-' | ':'))
                {
                    word.push(c);
                }
                tokens.push((start, Token::Word(word)));
            }
            other => return Err(err(start, &format!("unexpected character '{other}'"))),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    prefixes: HashMap<String, String>,
}

impl Parser {
    fn new(text: &str) -> Result<Self, QueryParseError> {
        let prefixes = ontology::PREFIXES
            .iter()
            .map(|(p, ns)| (p.to_string(), ns.to_string()))
            .collect();
        Ok(Self {
            tokens: tokenize(text)?,
            pos: 0,
            end: text.len(),
            prefixes,
        })
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(o, _)| *o)
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, QueryParseError> {
        Err(QueryParseError {
            offset: self.offset(),
            message: message.into(),
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword))
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), QueryParseError> {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            Ok(())
        } else {
            self.error(format!("expected {keyword}"))
        }
    }

    fn expect(&mut self, want: Token) -> Result<(), QueryParseError> {
        if self.peek() == Some(&want) {
            self.pos += 1;
            Ok(())
        } else {
            self.error(format!("expected {want:?}"))
        }
    }

    fn query(mut self) -> Result<Query, QueryParseError> {
        while self.peek_keyword("PREFIX") {
            self.pos += 1;
            let name = match self.next() {
                Some(Token::Word(w)) if w.ends_with(':') && w.matches(':').count() == 1 => {
                    w.trim_end_matches(':').to_string()
                }
                _ => {
                    self.pos = self.pos.saturating_sub(1);
                    return self.error("expected prefix name ending in ':'");
                }
            };
            match self.next() {
                Some(Token::Iri(iri)) => {
                    self.prefixes.insert(name, iri);
                }
                _ => {
                    self.pos = self.pos.saturating_sub(1);
                    return self.error("expected namespace IRI");
                }
            }
        }

        self.expect_keyword("SELECT")?;
        let projection = if self.peek() == Some(&Token::Star) {
            self.pos += 1;
            Projection::All
        } else {
            let mut vars = Vec::new();
            while let Some(Token::Var(v)) = self.peek() {
                vars.push(v.clone());
                self.pos += 1;
            }
            if vars.is_empty() {
                return self.error("expected '*' or variables after SELECT");
            }
            Projection::Vars(vars)
        };

        if self.peek_keyword("WHERE") {
            self.pos += 1;
        }
        let pattern = self.group()?;

        let mut order_by = Vec::new();
        if self.peek_keyword("ORDER") {
            self.pos += 1;
            self.expect_keyword("BY")?;
            while let Some(Token::Var(v)) = self.peek() {
                order_by.push(v.clone());
                self.pos += 1;
            }
            if order_by.is_empty() {
                return self.error("expected variables after ORDER BY");
            }
        }

        if self.peek().is_some() {
            return self.error("unexpected trailing input");
        }
        Ok(Query {
            projection,
            pattern,
            order_by,
        })
    }

    fn group(&mut self) -> Result<GroupPattern, QueryParseError> {
        self.expect(Token::LBrace)?;
        let mut group = GroupPattern::new();
        loop {
            match self.peek() {
                Some(Token::RBrace) => {
                    self.pos += 1;
                    return Ok(group);
                }
                Some(Token::Dot) => self.pos += 1,
                None => return self.error("unterminated group"),
                _ if self.peek_keyword("OPTIONAL") => {
                    self.pos += 1;
                    let inner = self.group()?;
                    group = group.optional(inner);
                }
                _ => {
                    let subject = self.term(false)?;
                    let predicate = self.term(true)?;
                    let object = self.term(false)?;
                    if matches!(subject, PatternTerm::Const(Term::Literal(_)))
                        || matches!(predicate, PatternTerm::Const(Term::Literal(_)))
                    {
                        return self.error("literals are only allowed in object position");
                    }
                    group = group.triple(subject, predicate, object);
                }
            }
        }
    }

    fn term(&mut self, predicate_position: bool) -> Result<PatternTerm, QueryParseError> {
        let token = match self.peek() {
            Some(t) => t.clone(),
            None => return self.error("expected term"),
        };
        let term = match token {
            Token::Var(v) => PatternTerm::Var(v),
            Token::Iri(iri) => PatternTerm::iri(&iri),
            Token::Literal(value) => PatternTerm::literal(&value),
            Token::Word(w) if predicate_position && w == "a" => PatternTerm::iri(standard::RDF_TYPE),
            Token::Word(w) => match w.split_once(':') {
                Some((prefix, local)) => match self.prefixes.get(prefix) {
                    Some(ns) => PatternTerm::iri(&format!("{ns}{local}")),
                    None => return self.error(format!("unknown prefix '{prefix}'")),
                },
                None => return self.error(format!("unexpected word '{w}'")),
            },
            other => return self.error(format!("unexpected {other:?}")),
        };
        self.pos += 1;
        Ok(term)
    }
}
