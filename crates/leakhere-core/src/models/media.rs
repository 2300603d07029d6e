use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published media record as returned by `/files` and `/view`.
///
/// The API is loose about which fields are present, so everything but the id is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    pub file_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Category tag, e.g. `"images"`. Kept as text so unknown categories still list.
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_extension: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub uploader_name: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub download_count: Option<u64>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub share_link: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl MediaFile {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.file_name.as_deref())
            .unwrap_or("Untitled")
    }

    /// Upload time used for "recent" ordering.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.uploaded_at.or(self.created_at)
    }

    /// Suggested local file name for a download.
    pub fn download_file_name(&self) -> String {
        let title = self
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("download");
        format!("{}.{}", title, self.file_extension.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub has_next: Option<bool>,
}

/// Response of `GET /files`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilesPage {
    #[serde(default)]
    pub files: Vec<MediaFile>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Query of `GET /files`. Type filter and sort order are applied client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilesQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl FilesQuery {
    pub fn new(page: u32, limit: u32, search: Option<&str>) -> Self {
        Self {
            page,
            limit,
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// Response of `GET /view`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewResponse {
    #[serde(default)]
    pub file: Option<MediaFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackDownloadRequest {
    pub file_id: String,
}
