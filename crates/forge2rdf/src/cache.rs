//! Snapshot cache policy: when to load the persisted graph and when to write it.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::store::{StoreError, TripleStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CachePolicy {
    /// Load the snapshot if it exists and parses, persist at the end.
    #[default]
    UseIfPresent,
    /// Ignore any snapshot, persist at the end.
    ForceRefresh,
    /// Neither load nor persist.
    Disabled,
}

impl CachePolicy {
    pub fn loads(self) -> bool {
        self == CachePolicy::UseIfPresent
    }

    pub fn persists(self) -> bool {
        self != CachePolicy::Disabled
    }
}

/// The snapshot file together with the policy governing it.
#[derive(Debug, Clone)]
pub struct GraphCache {
    path: PathBuf,
    policy: CachePolicy,
}

impl GraphCache {
    pub fn new(path: &Path, policy: CachePolicy) -> Self {
        Self {
            path: path.to_path_buf(),
            policy,
        }
    }

    /// The starting graph for a harvest run.
    ///
    /// A missing or unreadable snapshot is a cache miss, never an error.
    pub fn load_or_empty(&self) -> TripleStore {
        if !self.policy.loads() {
            info!(policy = ?self.policy, "not loading snapshot");
            return TripleStore::new();
        }
        match TripleStore::load(&self.path) {
            Ok(store) => {
                info!(path = %self.path.display(), statements = store.len(), "loaded snapshot");
                store
            }
            Err(e) if e.is_not_found() => {
                info!(path = %self.path.display(), "no snapshot yet, starting empty");
                TripleStore::new()
            }
            Err(e) => {
                warn!(error = %e, "unusable snapshot, starting empty");
                TripleStore::new()
            }
        }
    }

    /// Overwrite the snapshot, unless persistence is disabled.
    ///
    /// Returns whether a file was written.
    pub fn persist(&self, store: &TripleStore) -> Result<bool, StoreError> {
        if !self.policy.persists() {
            info!("persistence disabled, snapshot not written");
            return Ok(false);
        }
        store.save(&self.path)?;
        info!(path = %self.path.display(), statements = store.len(), "wrote snapshot");
        Ok(true)
    }
}
