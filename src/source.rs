//! Locating, reading and writing the local pyproject.toml.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// File name looked up when the source is a directory.
pub const PYPROJECT: &str = "pyproject.toml";

/// Resolve `source` to an existing pyproject.toml.
///
/// A file path is used as is; a directory path gets `pyproject.toml`
/// appended. The result is canonicalized.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] if no file exists at the resolved path.
pub fn resolve_pyproject(source: &Path) -> Result<PathBuf, SourceError> {
    let candidate = if source.is_file() {
        source.to_path_buf()
    } else {
        source.join(PYPROJECT)
    };
    if !candidate.is_file() {
        return Err(SourceError::NotFound(candidate));
    }
    dunce::canonicalize(&candidate).map_err(|source| SourceError::Io {
        path: candidate,
        source,
    })
}

/// Read the whole file as UTF-8 text.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read.
pub fn read(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the file's contents.
///
/// Writes to a sibling temporary file first and renames it over `path`, so
/// an interrupted write never leaves a truncated file behind. The original
/// file's permissions carry over; the temporary file is removed on failure.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the temporary file cannot be written or
/// renamed.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), SourceError> {
    let tmp = tmp_path(path);
    fs::write(&tmp, contents)
        .and_then(|()| match fs::metadata(path) {
            Ok(meta) => fs::set_permissions(&tmp, meta.permissions()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        })
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|source| {
            fs::remove_file(&tmp).ok();
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
}

/// Return a sibling path used as the write target before the final rename.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| PYPROJECT.into(), std::ffi::OsStr::to_os_string);
    name.push(".ruff-sync.tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn directory_source_appends_pyproject() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PYPROJECT), "").unwrap();
        let resolved = resolve_pyproject(dir.path()).unwrap();
        assert_eq!(resolved.file_name().unwrap(), PYPROJECT);
        assert!(resolved.is_absolute());
    }

    #[test]
    fn file_source_is_used_directly() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        fs::write(&file, "").unwrap();
        let resolved = resolve_pyproject(&file).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "custom.toml");
    }

    #[test]
    fn missing_pyproject_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_pyproject(dir.path()).unwrap_err();
        assert!(matches!(err, SourceError::NotFound(ref p) if p.ends_with(PYPROJECT)));
    }

    #[test]
    fn write_atomic_replaces_contents_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(PYPROJECT);
        fs::write(&file, "old = 1\n").unwrap();

        write_atomic(&file, "new = 2\n").unwrap();

        assert_eq!(read(&file).unwrap(), "new = 2\n");
        assert!(!tmp_path(&file).exists());
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn write_atomic_cleans_up_when_rename_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();

        let err = write_atomic(&target, "new = 2\n").unwrap_err();

        assert!(matches!(err, SourceError::Io { .. }));
        assert!(!tmp_path(&target).exists());
        assert!(target.join("keep.txt").exists());
    }

    #[test]
    fn write_atomic_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(PYPROJECT);

        write_atomic(&file, "a = 1\n").unwrap();

        assert_eq!(read(&file).unwrap(), "a = 1\n");
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt as _;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(PYPROJECT);
        fs::write(&file, "old = 1\n").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&file, "new = 2\n").unwrap();

        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
