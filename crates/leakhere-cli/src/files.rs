//! Turning paths given on the command line into `SelectedFile`s.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use leakhere_core::models::SelectedFile;

/// Stat `path` and describe it for upload. The MIME type is guessed from the
/// extension; unknown extensions become `application/octet-stream` and are left for
/// category validation to reject.
pub fn load_selected_file(path: &Path) -> Result<SelectedFile> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("{} is not a file", path.display());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let last_modified = metadata.modified().ok().map(DateTime::<Utc>::from);

    Ok(SelectedFile::from_path(
        path,
        name,
        metadata.len(),
        mime_type,
        last_modified,
    ))
}
