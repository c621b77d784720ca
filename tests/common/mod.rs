// Shared helpers for integration tests.
//
// Provides a temporary project directory holding a pyproject.toml and
// canned fetchers, so each test can drive a full sync without touching the
// network.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use ruff_sync::cli::SyncOpts;
use ruff_sync::error::FetchError;
use ruff_sync::fetch::Fetcher;

/// An isolated project backed by a [`tempfile::TempDir`].
pub struct ProjectContext {
    /// Temporary directory containing the project.
    pub root: tempfile::TempDir,
}

impl ProjectContext {
    /// Create a project whose pyproject.toml holds `content`.
    pub fn new(content: &str) -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::write(root.path().join("pyproject.toml"), content).expect("write pyproject.toml");
        Self { root }
    }

    /// Path to the project directory.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path to the project's pyproject.toml.
    pub fn pyproject(&self) -> PathBuf {
        self.root.path().join("pyproject.toml")
    }

    /// Current contents of the project's pyproject.toml.
    pub fn read(&self) -> String {
        std::fs::read_to_string(self.pyproject()).expect("read pyproject.toml")
    }

    /// Sync options pointing at this project with the given upstream URL.
    pub fn opts(&self, upstream: &str) -> SyncOpts {
        SyncOpts {
            upstream: Some(upstream.to_string()),
            source: self.root.path().to_path_buf(),
            exclude: Vec::new(),
            dry_run: false,
        }
    }
}

/// Fetcher that serves one fixed body and records requested URLs.
pub struct StaticFetcher {
    body: String,
    requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        Ok(self.body.clone())
    }
}

/// Fetcher that always answers with an HTTP error status.
pub struct FailingFetcher {
    pub status: u16,
}

impl Fetcher for FailingFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        Err(FetchError::Status {
            url: url.to_string(),
            status: self.status,
        })
    }
}
