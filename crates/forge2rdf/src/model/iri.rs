//! IRI minting and parsing for hosted repositories.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use super::project::ProjectDescriptor;

/// Characters that need percent-encoding in an owner or repository segment.
/// Owners and repos are normally `[A-Za-z0-9._-]`, so this only guards
/// against hand-edited configuration.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Generates and recognises repository IRIs rooted at a forge API base.
///
/// The IRI of a project is its API endpoint, e.g.
/// `https://api.github.com/repos/kubernetes/kubernetes`.
#[derive(Debug, Clone)]
pub struct IriMinter {
    api_base: String,
}

impl IriMinter {
    pub fn new(api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn escape(value: &str) -> String {
        utf8_percent_encode(value, SEGMENT_ENCODE_SET).to_string()
    }

    /// IRI for a repository (doap:Project subject).
    pub fn repository_iri(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_base,
            Self::escape(owner),
            Self::escape(repo)
        )
    }

    /// IRI for a configured project.
    pub fn project_iri(&self, project: &ProjectDescriptor) -> String {
        self.repository_iri(&project.owner, &project.repo)
    }

    /// Recover the `owner/repo` pair from a repository IRI.
    ///
    /// Returns `None` unless the IRI has exactly the shape
    /// `<api base>/repos/<owner>/<repo>`.
    pub fn repo_slug(&self, iri: &str) -> Option<ProjectDescriptor> {
        let rest = iri.strip_prefix(&self.api_base)?.strip_prefix("/repos/")?;
        let mut segments = rest.split('/');
        let owner = segments.next()?;
        let repo = segments.next()?;
        if segments.next().is_some() || owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some(ProjectDescriptor::new(
            &percent_decode_str(owner).decode_utf8_lossy(),
            &percent_decode_str(repo).decode_utf8_lossy(),
        ))
    }
}

impl Default for IriMinter {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_API_BASE_URL)
    }
}
