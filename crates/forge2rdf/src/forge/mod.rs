//! Source-forge collaborators: repository metadata and code search.
//!
//! The harvester and dependency pass only see the [`RepositoryFetcher`] and
//! [`CodeSearch`] traits; [`github::GitHubClient`] implements both over HTTP.

pub mod github;
pub mod http_cache;
pub mod retry;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ProjectDescriptor;

/// Failures reported by a forge collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("transport error talking to {url}: {message}")]
    Transport { url: String, message: String },
    #[error("rate limited by {url}")]
    RateLimited {
        url: String,
        retry_after: Option<Duration>,
    },
    #[error("not found: {url}")]
    NotFound { url: String },
    /// The search endpoint rejected the query itself (HTTP 422).
    #[error("search cannot process query: {message}")]
    UnprocessableQuery { message: String },
    #[error("HTTP {status} from {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },
    #[error("cannot decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ForgeError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ForgeError::Timeout { .. }
            | ForgeError::Transport { .. }
            | ForgeError::RateLimited { .. } => true,
            ForgeError::Status { status, .. } => *status >= 500,
            ForgeError::NotFound { .. }
            | ForgeError::UnprocessableQuery { .. }
            | ForgeError::Decode { .. } => false,
        }
    }
}

/// Repository fields the harvester turns into statements.
///
/// `language`, `homepage` and `description` are frequently `null` upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSort {
    #[default]
    BestMatch,
    Indexed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SearchSort {
    /// Value of the `sort` query parameter; best match is the absence of one.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            SearchSort::BestMatch => None,
            SearchSort::Indexed => Some("indexed"),
        }
    }
}

impl SortOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSearchRequest {
    pub query: String,
    pub sort: SearchSort,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSearchHit {
    pub path: String,
    #[serde(default)]
    pub name: String,
}

/// Ranked search results; `items[0]` is the best-ranked hit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeSearchResults {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<CodeSearchHit>,
}

pub trait RepositoryFetcher {
    fn fetch_repository(&self, project: &ProjectDescriptor)
        -> Result<RepositoryMetadata, ForgeError>;
}

pub trait CodeSearch {
    fn search_code(&self, request: &CodeSearchRequest) -> Result<CodeSearchResults, ForgeError>;
}

impl<T: RepositoryFetcher + ?Sized> RepositoryFetcher for &T {
    fn fetch_repository(
        &self,
        project: &ProjectDescriptor,
    ) -> Result<RepositoryMetadata, ForgeError> {
        (**self).fetch_repository(project)
    }
}

impl<T: CodeSearch + ?Sized> CodeSearch for &T {
    fn search_code(&self, request: &CodeSearchRequest) -> Result<CodeSearchResults, ForgeError> {
        (**self).search_code(request)
    }
}
