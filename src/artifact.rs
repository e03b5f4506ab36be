//! Reading baselines and writing artifacts.
//!
//! Artifacts are always replaced whole: the new content is written to a
//! temporary file next to the target and renamed over it.

use crate::error::{Result, SyncError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const INDENT: &[u8] = b"    ";

/// Read and parse a JSON file. `Ok(None)` when the file does not exist.
pub fn read_json(path: &Path) -> Result<Option<Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SyncError::persistence(path, e)),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| SyncError::content(&path.display().to_string(), e.to_string()))
}

/// Pretty JSON with 4-space indentation; non-ASCII is written as-is.
pub fn to_pretty_json<T: Serialize>(value: &T, trailing_newline: bool) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    if trailing_newline {
        out.push(b'\n');
    }
    Ok(out)
}

/// Serialize `value` and atomically replace `path` with it, creating the
/// parent directory if needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T, trailing_newline: bool) -> Result<()> {
    let bytes = to_pretty_json(value, trailing_newline)
        .map_err(|e| SyncError::persistence(path, e.into()))?;
    write_atomic(path, &bytes)
}

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(parent).map_err(|e| SyncError::persistence(parent, e))?;

    let mut file = NamedTempFile::new_in(parent).map_err(|e| SyncError::persistence(parent, e))?;
    file.write_all(bytes)
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| SyncError::persistence(path, e))?;
    file.persist(path)
        .map_err(|e| SyncError::persistence(path, e.error))?;

    Ok(())
}
