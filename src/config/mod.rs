//! Settings for one sync run.
//!
//! Values come from three layers, highest priority first: command-line
//! flags, the local `[tool.ruff-sync]` table, and built-in defaults.
pub mod toml_loader;

use crate::error::ConfigError;
use crate::fetch::resolve_raw_url;
use crate::merge::ExclusionSet;

pub use toml_loader::{SyncConfig, load_sync_config};

/// Fully resolved settings for the merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// URL the upstream document is fetched from (GitHub blob URLs already
    /// rewritten to raw URLs).
    pub upstream: String,
    /// Keys kept out of the sync.
    pub exclude: ExclusionSet,
}

impl Settings {
    /// Combine command-line values with the local `[tool.ruff-sync]` table.
    ///
    /// `cli_exclude` replaces the configured exclusions when non-empty. An
    /// empty `exclude = []` in the file means "exclude nothing"; no setting
    /// at all falls back to [`ExclusionSet::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingUpstream`] if neither layer names an
    /// upstream URL, or [`ConfigError::InvalidExclusion`] for a malformed
    /// exclusion key.
    pub fn resolve(
        cli_upstream: Option<&str>,
        cli_exclude: &[String],
        file: &SyncConfig,
    ) -> Result<Self, ConfigError> {
        let upstream = cli_upstream
            .or(file.upstream.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingUpstream)?;

        let exclude = if !cli_exclude.is_empty() {
            ExclusionSet::parse(cli_exclude)?
        } else if let Some(keys) = &file.exclude {
            ExclusionSet::parse(keys)?
        } else {
            ExclusionSet::default()
        };

        Ok(Self {
            upstream: resolve_raw_url(upstream),
            exclude,
        })
    }
}

/// Warnings about a `[tool.ruff-sync]` table, one per unknown key.
#[must_use]
pub fn warnings(config: &SyncConfig) -> Vec<String> {
    config
        .unknown
        .keys()
        .map(|key| format!("Unknown ruff-sync configuration: {key}"))
        .collect()
}
