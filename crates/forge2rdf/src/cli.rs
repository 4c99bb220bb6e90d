//! Flags and setup shared by every binary.

use std::path::PathBuf;

use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::cache::CachePolicy;
use crate::config::{Config, ConfigError, DEFAULT_CONFIG_FILE};

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Write debugging info to stderr.
    #[arg(short, long)]
    pub debug: bool,

    /// Run verbosely.
    #[arg(short, long)]
    pub verbose: bool,

    /// Ignore the snapshot and rebuild it from the forge.
    #[arg(long)]
    pub no_cache: bool,

    /// Cache forge API responses on disk.
    #[arg(long)]
    pub http_cache: bool,

    /// Set config file name to FILENAME.
    #[arg(short, long, value_name = "FILENAME", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

impl CommonArgs {
    /// `--no-cache` forces a refresh unless an explicit policy was given.
    pub fn cache_policy(&self, explicit: Option<CachePolicy>) -> CachePolicy {
        match explicit {
            Some(policy) => policy,
            None if self.no_cache => CachePolicy::ForceRefresh,
            None => CachePolicy::UseIfPresent,
        }
    }

    pub fn load_config(&self) -> Result<Config, ConfigError> {
        Config::load(&self.config)
    }

    /// Level used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the flags.
pub fn init_logging(args: &CommonArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
