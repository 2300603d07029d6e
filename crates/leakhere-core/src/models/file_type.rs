use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_STANDARD_FILE_SIZE, MAX_VIDEO_FILE_SIZE};

/// Upload category chosen before files are selected.
///
/// The category fixes which MIME types are accepted and the maximum file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileTypeCategory {
    Images,
    Videos,
    Gifs,
    Documents,
}

const IMAGE_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];
const VIDEO_MIME_TYPES: &[&str] = &["video/mp4", "video/webm"];
const GIF_MIME_TYPES: &[&str] = &["image/gif"];
const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

impl FileTypeCategory {
    pub const ALL: [FileTypeCategory; 4] = [
        FileTypeCategory::Images,
        FileTypeCategory::Videos,
        FileTypeCategory::Gifs,
        FileTypeCategory::Documents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileTypeCategory::Images => "images",
            FileTypeCategory::Videos => "videos",
            FileTypeCategory::Gifs => "gifs",
            FileTypeCategory::Documents => "documents",
        }
    }

    /// Allow-list entries. An entry ending in `/*` matches any subtype.
    pub fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            FileTypeCategory::Images => IMAGE_MIME_TYPES,
            FileTypeCategory::Videos => VIDEO_MIME_TYPES,
            FileTypeCategory::Gifs => GIF_MIME_TYPES,
            FileTypeCategory::Documents => DOCUMENT_MIME_TYPES,
        }
    }

    /// Maximum accepted size in bytes.
    pub fn max_file_size(&self) -> u64 {
        match self {
            FileTypeCategory::Videos => MAX_VIDEO_FILE_SIZE,
            FileTypeCategory::Images | FileTypeCategory::Gifs | FileTypeCategory::Documents => {
                MAX_STANDARD_FILE_SIZE
            }
        }
    }

    pub fn accepts_mime(&self, mime_type: &str) -> bool {
        self.allowed_mime_types()
            .iter()
            .any(|allowed| mime_matches(allowed, mime_type))
    }
}

/// Whether `mime_type` satisfies one allow-list entry, ignoring case and surrounding
/// whitespace. `type/*` matches every subtype of `type` and nothing else.
pub fn mime_matches(allowed: &str, mime_type: &str) -> bool {
    let mime_type = mime_type.trim().to_lowercase();
    let allowed = allowed.trim().to_lowercase();
    match allowed.strip_suffix("/*") {
        Some(top_level) => mime_type
            .split_once('/')
            .is_some_and(|(kind, subtype)| kind == top_level && !subtype.is_empty()),
        None => mime_type == allowed,
    }
}

impl fmt::Display for FileTypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid file type: {0}. Must be one of: images, videos, gifs, documents")]
pub struct ParseFileTypeError(pub String);

impl FromStr for FileTypeCategory {
    type Err = ParseFileTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" | "images" => Ok(FileTypeCategory::Images),
            "video" | "videos" => Ok(FileTypeCategory::Videos),
            "gif" | "gifs" => Ok(FileTypeCategory::Gifs),
            "document" | "documents" => Ok(FileTypeCategory::Documents),
            other => Err(ParseFileTypeError(other.to_string())),
        }
    }
}
