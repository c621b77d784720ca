//! Keep a project's ruff configuration in line with an upstream copy.
//!
//! Fetches a reference `pyproject.toml`, takes its `[tool.ruff]` table and
//! splices it into the local file. Everything outside that table keeps its
//! original formatting and comments; keys in the exclusion set stay local.
//!
//! The public API is organised into layers:
//!
//! - **[`merge`]**: the format-preserving table merger
//! - **[`fetch`]** and **[`source`]**: reading upstream and local documents
//! - **[`config`]**: resolving settings from flags and `[tool.ruff-sync]`
//! - **[`commands`]**: the sync run that ties them together
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod merge;
pub mod source;

/// Version string shown by `--version`.
///
/// Set from `git describe` at build time when available.
pub const VERSION: &str = match option_env!("RUFF_SYNC_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
