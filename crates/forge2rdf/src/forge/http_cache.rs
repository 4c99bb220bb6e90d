//! On-disk cache of successful GET response bodies (`--http-cache`).
//!
//! Entries never expire; delete the directory to refresh. Cache I/O
//! failures are logged and otherwise ignored.

use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tracing::{debug, warn};

/// Longest file name we derive directly from a URL.
const MAX_FILE_NAME: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpCache {
    dir: PathBuf,
}

impl HttpCache {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// File holding the body for `url`.
    ///
    /// The URL is percent-encoded into a flat name; long URLs are truncated
    /// and suffixed with a content hash so distinct URLs keep distinct,
    /// stable entries.
    pub fn entry_path(&self, url: &str) -> PathBuf {
        let encoded = utf8_percent_encode(url, NON_ALPHANUMERIC).to_string();
        let name = if encoded.len() <= MAX_FILE_NAME {
            encoded
        } else {
            let hash = blake3::hash(url.as_bytes()).to_hex();
            // Encoded output is ASCII, so any byte index is a char boundary.
            format!("{}-{}", &encoded[..MAX_FILE_NAME - 17], &hash[..16])
        };
        self.dir.join(name)
    }

    pub fn get(&self, url: &str) -> Option<String> {
        let path = self.entry_path(url);
        match fs::read_to_string(&path) {
            Ok(body) => {
                debug!(url, path = %path.display(), "http cache hit");
                Some(body)
            }
            Err(_) => None,
        }
    }

    pub fn put(&self, url: &str, body: &str) {
        let path = self.entry_path(url);
        let result = fs::create_dir_all(&self.dir).and_then(|_| fs::write(&path, body));
        if let Err(e) = result {
            warn!(url, path = %path.display(), error = %e, "cannot write http cache entry");
        }
    }
}
