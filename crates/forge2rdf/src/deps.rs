//! Dependency enrichment: locate the `Godeps/Godeps.json` manifest of every
//! project written in a given language.
//!
//! Only the best-ranked search hit is reported; there is no check that it is
//! the repository's root manifest rather than a vendored copy.

use tracing::{info, warn};

use crate::forge::retry::RetryPolicy;
use crate::forge::{CodeSearch, CodeSearchRequest, ForgeError, SearchSort, SortOrder};
use crate::model::iri::IriMinter;
use crate::model::ontology::{doap, forge};
use crate::model::{ProjectDescriptor, Term, Triple};
use crate::store::query::{GroupPattern, PatternTerm, Query};
use crate::store::TripleStore;

pub const DEFAULT_LANGUAGE: &str = "Go";

/// The code-search query for a repository's Godeps manifest.
pub fn manifest_query(slug: &ProjectDescriptor) -> String {
    format!("filename:Godeps.json path:Godeps repo:{slug}")
}

/// Result of looking up one project's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOutcome {
    Found { path: String, total: u64 },
    NotFound,
    /// The IRI is not a hosted-repository IRI.
    Skipped { reason: String },
    /// Search failed for this project only.
    Failed { error: ForgeError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReport {
    pub project: String,
    pub outcome: ManifestOutcome,
}

pub struct DependencyScanner<S: CodeSearch> {
    search: S,
    iris: IriMinter,
    retry: RetryPolicy,
}

impl<S: CodeSearch> DependencyScanner<S> {
    pub fn new(search: S, iris: IriMinter) -> Self {
        Self {
            search,
            iris,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Subjects with `doap:programming-language "<language>"`, in store order.
    pub fn candidates(&self, store: &TripleStore, language: &str) -> Vec<String> {
        let query = Query::select_all(GroupPattern::new().triple(
            PatternTerm::var("project"),
            PatternTerm::iri(doap::PROGRAMMING_LANGUAGE),
            PatternTerm::literal(language),
        ));
        store
            .query(&query)
            .iter()
            .filter_map(|row| match row.get("project") {
                Some(Term::Iri(iri)) => Some(iri.clone()),
                _ => None,
            })
            .collect()
    }

    /// Look up the manifest of a single project IRI.
    pub fn scan_project(&self, project: &str) -> ManifestOutcome {
        let Some(slug) = self.iris.repo_slug(project) else {
            warn!(project, "not a hosted repository IRI, skipping");
            return ManifestOutcome::Skipped {
                reason: format!("not a repository IRI under {}", self.iris.api_base()),
            };
        };

        let request = CodeSearchRequest {
            query: manifest_query(&slug),
            sort: SearchSort::Indexed,
            order: SortOrder::Desc,
        };
        let results = match self
            .retry
            .run(&format!("search {slug}"), || self.search.search_code(&request))
        {
            Ok(results) => results,
            Err(error) => {
                warn!(project, %error, "manifest search failed");
                return ManifestOutcome::Failed { error };
            }
        };

        match results.items.first() {
            Some(top) => {
                info!(project, path = %top.path, total = results.total_count, "found manifest");
                ManifestOutcome::Found {
                    path: top.path.clone(),
                    total: results.total_count,
                }
            }
            None => {
                info!(project, "no manifest found");
                ManifestOutcome::NotFound
            }
        }
    }

    /// Scan every project in `language`; per-project failures never abort the batch.
    pub fn scan(&self, store: &TripleStore, language: &str) -> Vec<ManifestReport> {
        self.candidates(store, language)
            .into_iter()
            .map(|project| {
                let outcome = self.scan_project(&project);
                ManifestReport { project, outcome }
            })
            .collect()
    }
}

/// Write each found manifest back as `forge:dependencyManifest`.
///
/// Returns the number of new statements.
pub fn record_manifests(store: &mut TripleStore, reports: &[ManifestReport]) -> usize {
    store.extend(reports.iter().filter_map(|report| match &report.outcome {
        ManifestOutcome::Found { path, .. } => Some(Triple::literal(
            &report.project,
            forge::DEPENDENCY_MANIFEST,
            path,
        )),
        _ => None,
    }))
}

impl ManifestReport {
    /// One human-readable line for the report output.
    pub fn summary(&self) -> String {
        match &self.outcome {
            ManifestOutcome::Found { path, total } => {
                format!("{}: {path} ({total} match(es))", self.project)
            }
            ManifestOutcome::NotFound => format!("{}: no manifest found", self.project),
            ManifestOutcome::Skipped { reason } => format!("{}: skipped, {reason}", self.project),
            ManifestOutcome::Failed { error } => format!("{}: failed, {error}", self.project),
        }
    }
}
