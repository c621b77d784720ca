//! Structured logger with dry-run awareness.
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{DRY_RUN_TARGET, STAGE_TARGET};

/// Structured logger.
///
/// Thin facade over [`tracing`] that tags stage and dry-run messages with
/// their own targets and counts warnings for the final summary line.
#[derive(Debug, Default)]
pub struct Logger {
    warnings: AtomicUsize,
}

impl Logger {
    /// Create a new logger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            warnings: AtomicUsize::new(0),
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        self.warnings.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Number of warnings logged so far.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }
}
