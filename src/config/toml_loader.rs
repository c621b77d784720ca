//! `[tool.ruff-sync]` parsing from pyproject.toml text.
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings stored in the local `[tool.ruff-sync]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SyncConfig {
    /// Upstream pyproject.toml URL.
    pub upstream: Option<String>,
    /// Keys to exclude from the sync; `Some(vec![])` excludes nothing.
    pub exclude: Option<Vec<String>>,
    /// Keys this version does not understand.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PyProject {
    #[serde(default)]
    tool: Tool,
}

#[derive(Debug, Default, Deserialize)]
struct Tool {
    #[serde(rename = "ruff-sync", default)]
    ruff_sync: SyncConfig,
}

/// Deserialize the `[tool.ruff-sync]` table out of pyproject.toml `content`.
///
/// A document without the table yields [`SyncConfig::default`]. Other tables
/// are ignored.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if `content` is not valid TOML or the
/// table has the wrong shape (e.g. `exclude = "x"`).
pub fn load_sync_config(path: &Path, content: &str) -> Result<SyncConfig, ConfigError> {
    let pyproject: PyProject = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(pyproject.tool.ruff_sync)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn load(content: &str) -> Result<SyncConfig, ConfigError> {
        load_sync_config(Path::new("pyproject.toml"), content)
    }

    #[test]
    fn reads_upstream_and_exclude() {
        let config = load(
            r#"
[tool.ruff-sync]
upstream = "https://raw.githubusercontent.com/pydantic/pydantic/main/pyproject.toml"
exclude = ["per-file-ignores", "ignore", "line-length"]
"#,
        )
        .unwrap();
        assert_eq!(
            config.upstream.as_deref(),
            Some("https://raw.githubusercontent.com/pydantic/pydantic/main/pyproject.toml")
        );
        assert_eq!(
            config.exclude,
            Some(vec![
                "per-file-ignores".to_string(),
                "ignore".to_string(),
                "line-length".to_string()
            ])
        );
        assert!(config.unknown.is_empty());
    }

    #[test]
    fn missing_table_gives_defaults() {
        let config = load("[project]\nname = \"x\"\n\n[tool.ruff]\nline-length = 90\n").unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(load("").unwrap(), SyncConfig::default());
    }

    #[test]
    fn unknown_keys_are_collected() {
        let config = load("[tool.ruff-sync]\nsource = \".\"\nretries = 3\n").unwrap();
        let keys: Vec<&str> = config.unknown.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["retries", "source"]);
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let err = load("[tool.ruff-sync]\nexclude = \"per-file-ignores\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = load("[tool.ruff-sync\n").unwrap_err();
        assert!(err.to_string().contains("pyproject.toml"));
    }
}
