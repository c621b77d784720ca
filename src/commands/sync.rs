//! Command: sync the local `[tool.ruff]` table with upstream.
use anyhow::{Context as _, Result};

use crate::cli::SyncOpts;
use crate::config::{self, Settings};
use crate::error::RuffSyncError;
use crate::fetch::Fetcher;
use crate::logging::Logger;
use crate::merge;
use crate::source;

/// How a sync run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// The local file was rewritten.
    Updated,
    /// The merge produced identical text; nothing was written.
    UpToDate,
    /// Dry run: the file differs from upstream but was left alone.
    DryRun,
}

/// Run a sync: resolve the local file, fetch upstream, merge and write.
///
/// # Errors
///
/// Returns an error if the pyproject.toml cannot be found or read, settings
/// cannot be resolved, the fetch fails, the merge fails, or the result
/// cannot be written. The local file is untouched in every error case.
pub fn run(opts: &SyncOpts, fetcher: &dyn Fetcher, log: &Logger) -> Result<SyncStatus> {
    log.stage("Reading local configuration");
    let path = source::resolve_pyproject(&opts.source).map_err(RuffSyncError::from)?;
    log.info(&format!("pyproject: {}", path.display()));
    let local = source::read(&path).map_err(RuffSyncError::from)?;

    let file_config = config::load_sync_config(&path, &local).map_err(RuffSyncError::from)?;
    for warning in config::warnings(&file_config) {
        log.warn(&warning);
    }
    let settings = Settings::resolve(opts.upstream.as_deref(), &opts.exclude, &file_config)
        .map_err(RuffSyncError::from)?;
    log.debug(&format!("excluding: {}", display_or_none(&settings.exclude)));

    log.stage("Fetching upstream");
    log.info(&format!("upstream: {}", settings.upstream));
    let upstream = fetcher
        .fetch(&settings.upstream)
        .map_err(RuffSyncError::from)?;
    log.debug(&format!("received {} bytes", upstream.len()));

    log.stage("Merging [tool.ruff]");
    let outcome = merge::merge_documents(&upstream, &local, &settings.exclude)
        .map_err(RuffSyncError::from)?;
    for key in &outcome.excluded {
        log.info(&format!("skipped upstream {key}"));
    }
    for key in &outcome.preserved {
        log.info(&format!("kept local {key}"));
    }

    if !outcome.changed {
        log.info(&format!("{} is already up to date", path.display()));
        return Ok(SyncStatus::UpToDate);
    }

    if opts.dry_run {
        log.dry_run(&format!("would update {}", path.display()));
        return Ok(SyncStatus::DryRun);
    }

    log.stage("Writing pyproject.toml");
    source::write_atomic(&path, &outcome.document)
        .map_err(RuffSyncError::from)
        .with_context(|| format!("updating {}", path.display()))?;
    log.info(&format!("updated {}", path.display()));
    Ok(SyncStatus::Updated)
}

fn display_or_none(exclude: &merge::ExclusionSet) -> String {
    if exclude.is_empty() {
        "(none)".to_string()
    } else {
        exclude.to_string()
    }
}
