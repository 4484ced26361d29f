//! Log file preparation: path normalization, directory creation, append-mode open.

use crate::config::LogConfig;
use crate::error::{LogError, Result};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const LOG_SUFFIX: &str = ".log";

/// Append `.log` to `path` unless it already ends with it.
pub fn normalize_log_path(path: &Path) -> PathBuf {
    if path.as_os_str().to_string_lossy().ends_with(LOG_SUFFIX) {
        return path.to_path_buf();
    }
    let mut raw = OsString::from(path.as_os_str());
    raw.push(LOG_SUFFIX);
    PathBuf::from(raw)
}

/// The configured path, trimmed and normalized.
///
/// Empty paths are rejected with [`LogError::PathRequired`]. Paths naming a
/// directory (trailing separator, `..`, bare root) are rejected with
/// [`LogError::InvalidPath`] rather than becoming a hidden `.log` file.
pub fn resolve_log_path(config: &LogConfig) -> Result<PathBuf> {
    let raw = config.log_path().as_os_str().to_string_lossy();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LogError::PathRequired);
    }
    if names_directory(trimmed) {
        return Err(LogError::InvalidPath {
            path: PathBuf::from(trimmed),
            reason: "path names a directory, not a file",
        });
    }
    let path = if trimmed.len() == raw.len() {
        config.log_path().to_path_buf()
    } else {
        PathBuf::from(trimmed)
    };
    Ok(normalize_log_path(&path))
}

/// Ensure the log file exists and can be appended to.
///
/// Creates missing parent directories and the file itself. Existing
/// content is left untouched, so calling this repeatedly is harmless.
pub fn create_log_file(config: &LogConfig) -> Result<PathBuf> {
    let path = resolve_log_path(config)?;
    let fs = config.filesystem();

    if let Some(parent) = non_empty_parent(&path) {
        if !fs.is_dir(parent) {
            fs.create_dir_all(parent).map_err(|source| LogError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
            debug!(path = %parent.display(), "Created log directory");
        }
    }

    fs.open_append(&path).map_err(|source| LogError::OpenFile {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// Open the log file for appending without creating directories.
///
/// Fails with [`LogError::InvalidPath`] when the parent directory is missing.
pub fn open_log_file(config: &LogConfig) -> Result<(PathBuf, Box<dyn Write + Send>)> {
    let path = resolve_log_path(config)?;
    let fs = config.filesystem();

    if let Some(parent) = non_empty_parent(&path) {
        if !fs.is_dir(parent) {
            return Err(LogError::InvalidPath {
                path,
                reason: "parent directory does not exist",
            });
        }
    }

    let writer = fs.open_append(&path).map_err(|source| LogError::OpenFile {
        path: path.clone(),
        source,
    })?;
    Ok((path, writer))
}

fn names_directory(raw: &str) -> bool {
    raw.ends_with('/')
        || raw.ends_with(std::path::MAIN_SEPARATOR)
        || Path::new(raw).file_name().is_none()
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
