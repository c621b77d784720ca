//! Retrieval of the upstream pyproject.toml.
use std::time::Duration;

use crate::error::FetchError;

/// TCP connect timeout in seconds.
const CONNECT_TIMEOUT: u64 = 10;

/// Total transfer timeout in seconds.
const TRANSFER_TIMEOUT: u64 = 120;

/// Source of upstream document text.
///
/// The sync command only sees this trait, so tests can hand it canned
/// documents instead of going over the network.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher {
    /// Return the body of the document at `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the document cannot be retrieved.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP(S) fetcher. One request per call, no retries.
#[derive(Debug)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Create a fetcher with the default connect and transfer timeouts.
    #[must_use]
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(CONNECT_TIMEOUT)))
            .timeout_global(Some(Duration::from_secs(TRANSFER_TIMEOUT)))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => FetchError::Status {
                url: url.to_string(),
                status,
            },
            source => FetchError::Transport {
                url: url.to_string(),
                source,
            },
        })?;
        response
            .body_mut()
            .read_to_string()
            .map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })
    }
}

/// Convert a GitHub "blob" page URL into the raw file URL.
///
/// Parses URLs like:
///   `https://github.com/{owner}/{repo}/blob/{ref}/{path}`
/// and returns
///   `https://raw.githubusercontent.com/{owner}/{repo}/{ref}/{path}`.
/// Any other URL is returned unchanged.
#[must_use]
pub fn resolve_raw_url(url: &str) -> String {
    let Some(rest) = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
    else {
        return url.to_string();
    };

    let parts: Vec<&str> = rest.split('/').collect();
    match parts.as_slice() {
        [owner, repo, "blob", reference, path @ ..] if !path.is_empty() => format!(
            "https://raw.githubusercontent.com/{owner}/{repo}/{reference}/{}",
            path.join("/")
        ),
        _ => url.to_string(),
    }
}
