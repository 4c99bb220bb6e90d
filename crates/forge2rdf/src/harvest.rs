//! Project harvester: turns repository metadata into DOAP statements.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::forge::retry::RetryPolicy;
use crate::forge::{ForgeError, RepositoryFetcher, RepositoryMetadata};
use crate::model::iri::IriMinter;
use crate::model::ontology::{doap, forge, standard};
use crate::model::{ProjectDescriptor, Term, Triple};
use crate::store::TripleStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HarvestError {
    #[error("fetching {project} failed: {source}")]
    Fetch {
        project: ProjectDescriptor,
        #[source]
        source: ForgeError,
    },
    #[error("{project} returned an empty repository URL")]
    MissingUrl { project: ProjectDescriptor },
}

/// What happened to one configured project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestOutcome {
    /// Fetched; `inserted` counts statements new to the store.
    Harvested { iri: String, inserted: usize },
    /// Already described by the loaded snapshot; not fetched.
    Cached { iri: String },
}

/// Per-run summary; failures never stop the remaining projects.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub outcomes: Vec<(ProjectDescriptor, HarvestOutcome)>,
    pub failures: Vec<HarvestError>,
}

impl HarvestReport {
    pub fn harvested(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, HarvestOutcome::Harvested { .. }))
            .count()
    }

    pub fn cached(&self) -> usize {
        self.outcomes.len() - self.harvested()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Characters that may not appear raw in an IRI reference.
const IRI_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// The free-text homepage field as an absolute IRI.
///
/// Blank values and values without a scheme (`kubernetes.io`) yield `None`;
/// unsafe characters are percent-encoded.
pub fn homepage_iri(raw: &str) -> Option<String> {
    let homepage = raw.trim();
    let (scheme, rest) = homepage.split_once(':')?;
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok || rest.is_empty() {
        debug!(homepage, "homepage is not an absolute IRI, skipping");
        return None;
    }
    Some(utf8_percent_encode(homepage, IRI_UNSAFE).to_string())
}

/// The statements describing one fetched repository.
///
/// Homepage is only asserted (as an IRI) when it is an absolute IRI; a
/// missing language or description produces no statement.
pub fn project_statements(meta: &RepositoryMetadata) -> Vec<Triple> {
    let subject = meta.url.as_str();
    let mut triples = vec![
        Triple::iri(subject, standard::RDF_TYPE, doap::PROJECT),
        Triple::literal(subject, doap::NAME, &meta.name),
    ];
    if let Some(language) = &meta.language {
        triples.push(Triple::literal(subject, doap::PROGRAMMING_LANGUAGE, language));
    }
    if let Some(homepage) = meta.homepage.as_deref().and_then(homepage_iri) {
        triples.push(Triple::iri(subject, doap::HOMEPAGE, &homepage));
    }
    if let Some(description) = &meta.description {
        triples.push(Triple::literal(subject, doap::DESCRIPTION, description));
    }
    triples
}

pub struct ProjectHarvester<F: RepositoryFetcher> {
    fetcher: F,
    retry: RetryPolicy,
    iris: IriMinter,
    skip_cached: bool,
}

impl<F: RepositoryFetcher> ProjectHarvester<F> {
    pub fn new(fetcher: F, iris: IriMinter) -> Self {
        Self {
            fetcher,
            retry: RetryPolicy::default(),
            iris,
            skip_cached: true,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// When false, projects already in the store are fetched again anyway.
    pub fn skip_cached(mut self, skip: bool) -> Self {
        self.skip_cached = skip;
        self
    }

    /// The subject already describing `project`, if any.
    ///
    /// Renamed repositories are stored under the URL the forge answered
    /// with, so besides the minted IRI this also follows `forge:requestedAs`.
    fn cached_iri(&self, store: &TripleStore, project: &ProjectDescriptor) -> Option<String> {
        let named = |iri: &str| store.objects(iri, doap::NAME).next().is_some();
        let minted = self.iris.project_iri(project);
        if named(&minted) {
            return Some(minted);
        }
        let slug = Term::literal(project.to_string());
        let found = store
            .subjects(forge::REQUESTED_AS, &slug)
            .find(|iri| named(iri))
            .map(str::to_string);
        found
    }

    /// Fetch one project (with retries) and insert its statements.
    pub fn harvest_project(
        &self,
        store: &mut TripleStore,
        project: &ProjectDescriptor,
    ) -> Result<HarvestOutcome, HarvestError> {
        if self.skip_cached {
            if let Some(iri) = self.cached_iri(store, project) {
                info!(%project, %iri, "already in snapshot, not fetching");
                return Ok(HarvestOutcome::Cached { iri });
            }
        }

        let meta = self
            .retry
            .run(&format!("fetch {project}"), || {
                self.fetcher.fetch_repository(project)
            })
            .map_err(|source| HarvestError::Fetch {
                project: project.clone(),
                source,
            })?;
        if meta.url.trim().is_empty() {
            return Err(HarvestError::MissingUrl {
                project: project.clone(),
            });
        }

        let mut statements = project_statements(&meta);
        if meta.url != self.iris.project_iri(project) {
            debug!(%project, iri = %meta.url, "forge answered under another URL");
            statements.push(Triple::literal(
                &meta.url,
                forge::REQUESTED_AS,
                &project.to_string(),
            ));
        }
        let inserted = store.extend(statements);
        info!(%project, iri = %meta.url, inserted, "harvested");
        Ok(HarvestOutcome::Harvested {
            iri: meta.url,
            inserted,
        })
    }

    /// Harvest every project in order, collecting failures instead of aborting.
    pub fn harvest_all(
        &self,
        store: &mut TripleStore,
        projects: &[ProjectDescriptor],
    ) -> HarvestReport {
        let mut report = HarvestReport::default();
        for project in projects {
            match self.harvest_project(store, project) {
                Ok(outcome) => report.outcomes.push((project.clone(), outcome)),
                Err(err) => {
                    error!(%project, error = %err, "harvest failed");
                    report.failures.push(err);
                }
            }
        }
        report
    }
}
