//! In-memory triple store with set semantics, persisted as N-Triples.
//!
//! The store remembers insertion order and iterates in that order, so query
//! solutions and snapshot files come out in the order facts were asserted.

pub mod ntriples;
pub mod query;

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::emitter::ntriples::NTriplesEmitter;
use crate::emitter::TriplesEmitter;
use crate::model::{Term, Triple};

use self::ntriples::NTriplesError;
use self::query::{Query, Solution};

/// Errors from loading or saving a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: NTriplesError,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the snapshot file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// The graph: a duplicate-free, insertion-ordered set of triples.
#[derive(Debug, Default, Clone)]
pub struct TripleStore {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

impl TripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple. Returns `false` (and changes nothing) if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Insert every triple, returning how many were new.
    pub fn extend<I: IntoIterator<Item = Triple>>(&mut self, triples: I) -> usize {
        triples
            .into_iter()
            .map(|t| self.insert(t))
            .filter(|&inserted| inserted)
            .count()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.seen.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Triples matching every position that is `Some`.
    pub fn matching<'a>(
        &'a self,
        subject: Option<&'a str>,
        predicate: Option<&'a str>,
        object: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| {
            subject.is_none_or(|s| t.subject == s)
                && predicate.is_none_or(|p| t.predicate == p)
                && object.is_none_or(|o| &t.object == o)
        })
    }

    /// All objects of `(subject, predicate, ?)`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a str,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.matching(Some(subject), Some(predicate), None)
            .map(|t| &t.object)
    }

    /// All subjects of `(?, predicate, object)`.
    pub fn subjects<'a>(
        &'a self,
        predicate: &'a str,
        object: &'a Term,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.matching(None, Some(predicate), Some(object))
            .map(|t| t.subject.as_str())
    }

    /// Run a query and return its solutions.
    pub fn query(&self, query: &Query) -> Vec<Solution> {
        query::execute(self, query)
    }

    /// Write every triple through `emitter`, in insertion order.
    pub fn dump<E: TriplesEmitter>(&self, emitter: &mut E) -> io::Result<()> {
        for triple in &self.triples {
            emitter.emit(triple)?;
        }
        emitter.flush()
    }

    /// Parse a snapshot from N-Triples text.
    pub fn from_ntriples(text: &str) -> Result<Self, NTriplesError> {
        let mut store = Self::new();
        for triple in ntriples::parse_document(text)? {
            store.insert(triple);
        }
        Ok(store)
    }

    /// Load a snapshot written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Self::from_ntriples(&text).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overwrite `path` with the full statement set.
    ///
    /// The snapshot is written to a sibling temp file first and renamed into
    /// place, so an interrupted write leaves the previous snapshot intact.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let file = File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
        let mut emitter = NTriplesEmitter::new(BufWriter::new(file));
        self.dump(&mut emitter)
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        drop(emitter);

        fs::rename(&tmp_path, path).map_err(|e| StoreError::io(path, e))
    }
}

impl PartialEq for TripleStore {
    /// Order-independent: two stores are equal when they hold the same statements.
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl Eq for TripleStore {}

impl FromIterator<Triple> for TripleStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}
