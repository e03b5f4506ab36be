use crate::error::{Result, SyncError};
use std::path::Path;
use tracing::{info, warn};

/// Locale codes for every `*.json` file directly inside `dir`, sorted.
///
/// File stems containing a dot are not valid codes and are skipped.
pub fn discover_locale_codes(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|e| SyncError::persistence(dir, e))?;

    let mut codes = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SyncError::persistence(dir, e))?.path();

        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        if stem.contains('.') {
            warn!("Skipping invalid locale code: {}", stem);
            continue;
        }
        codes.push(stem.to_string());
    }

    codes.sort();
    codes.dedup();
    info!("Found {} locale files", codes.len());
    Ok(codes)
}
