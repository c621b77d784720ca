//! Domain-specific error types for ruff-sync.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Library modules return typed errors (e.g., [`MergeError`], [`FetchError`])
//! while the command handler and `main` convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! RuffSyncError
//! ├── Fetch(FetchError)   : HTTP status, transport, body
//! ├── Merge(MergeError)   : parse failures, missing or malformed target table
//! ├── Source(SourceError) : pyproject.toml discovery, read and write
//! └── Config(ConfigError) : upstream resolution, exclusions, [tool.ruff-sync]
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for ruff-sync.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] at the CLI boundary.
#[derive(Error, Debug)]
pub enum RuffSyncError {
    /// Retrieving the upstream document failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Merging the target table failed.
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    /// Locating, reading or writing the local pyproject.toml failed.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Settings could not be resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Which of the two documents an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOrigin {
    /// The reference document fetched from the upstream URL.
    Upstream,
    /// The project's own pyproject.toml.
    Local,
}

impl fmt::Display for DocumentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream => f.write_str("upstream"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Errors raised while retrieving the upstream document.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The server answered with a non-success status code.
    #[error("GET {url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be completed (DNS, TLS, timeout, ...).
    #[error("GET {url} failed: {source}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying HTTP client error.
        source: ureq::Error,
    },

    /// The response body could not be read as UTF-8 text.
    #[error("reading response body from {url} failed: {source}")]
    Body {
        /// Requested URL.
        url: String,
        /// Underlying HTTP client error.
        source: ureq::Error,
    },
}

/// Errors raised by the table merger.
#[derive(Error, Debug)]
pub enum MergeError {
    /// A document is not valid TOML.
    #[error("{origin} document is not valid TOML: {source}")]
    Parse {
        /// Document that failed to parse.
        origin: DocumentOrigin,
        /// Parser diagnostic.
        source: toml_edit::TomlError,
    },

    /// The upstream document has no (or an empty) target table.
    #[error("No `{path}` section found in upstream document")]
    MissingTable {
        /// Dotted path of the target table.
        path: String,
    },

    /// A key on the way to the target table holds a non-table value.
    #[error("`{path}` in {origin} document is not a table")]
    NotATable {
        /// Document holding the offending value.
        origin: DocumentOrigin,
        /// Dotted path of the offending key.
        path: String,
    },
}

/// Errors raised while locating, reading or writing the local pyproject.toml.
#[derive(Error, Debug)]
pub enum SourceError {
    /// No pyproject.toml exists at the resolved location.
    #[error("pyproject.toml not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while reading or writing the file.
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path of the file being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised while resolving settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No upstream URL was given on the command line or in `[tool.ruff-sync]`.
    #[error("no upstream URL given: pass one on the command line or set `upstream` in [tool.ruff-sync]")]
    MissingUpstream,

    /// An exclusion entry is not a valid (dotted) TOML key.
    #[error("invalid exclusion key '{key}': {message}")]
    InvalidExclusion {
        /// Entry as written by the user.
        key: String,
        /// Parser diagnostic.
        message: String,
    },

    /// The local pyproject.toml could not be deserialized.
    #[error("invalid TOML in {path}: {source}")]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Deserializer diagnostic.
        source: toml::de::Error,
    },
}
