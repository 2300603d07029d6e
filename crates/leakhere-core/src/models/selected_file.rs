use std::path::PathBuf;

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Where the bytes of a selected file come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Read lazily from disk at upload time.
    Path(PathBuf),
    Memory(Bytes),
}

/// A file chosen for upload.
///
/// Only the reported metadata (`name`, `size`, `mime_type`) is used for validation;
/// the content is never inspected.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            mime_type: mime_type.into(),
            last_modified: None,
            source: FileSource::Memory(data),
        }
    }

    pub fn from_path(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        last_modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            last_modified,
            source: FileSource::Path(path.into()),
        }
    }

    /// Identity used to drop re-selected files.
    pub fn signature(&self) -> (&str, u64) {
        (self.name.as_str(), self.size)
    }

    /// Name with the final extension removed. Names without a usable stem
    /// (`"README"`, `".env"`) are returned whole.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) if idx > 0 => &self.name[..idx],
            _ => &self.name,
        }
    }

    /// Lowercased text after the last `.`. A name without a dot is returned whole,
    /// lowercased.
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}
