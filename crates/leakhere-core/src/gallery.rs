//! Client-side filtering, sorting and paging of the gallery.
//!
//! `/files` only understands `page`, `limit` and `search`; type filter and sort order are
//! applied to the accumulated list here.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::models::{FileTypeCategory, MediaFile, Pagination};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(FileTypeCategory),
}

impl TypeFilter {
    pub fn matches(&self, file: &MediaFile) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(category) => file.file_type.as_deref() == Some(category.as_str()),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = crate::models::ParseFileTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse().map(TypeFilter::Only)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first by upload time (falling back to creation time).
    #[default]
    Recent,
    Views,
    Downloads,
    Likes,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Recent => "Most Recent",
            SortOrder::Views => "Most Viewed",
            SortOrder::Downloads => "Most Downloaded",
            SortOrder::Likes => "Most Liked",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid sort order: {0}. Must be one of: recent, views, downloads, likes")]
pub struct ParseSortOrderError(pub String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(SortOrder::Recent),
            "views" => Ok(SortOrder::Views),
            "downloads" => Ok(SortOrder::Downloads),
            "likes" => Ok(SortOrder::Likes),
            other => Err(ParseSortOrderError(other.to_string())),
        }
    }
}

/// Filtered copy of `files` in `sort` order. The sort is stable, so ties keep API order.
pub fn filter_and_sort(files: &[MediaFile], filter: TypeFilter, sort: SortOrder) -> Vec<MediaFile> {
    let mut result: Vec<MediaFile> = files.iter().filter(|f| filter.matches(f)).cloned().collect();

    match sort {
        SortOrder::Recent => result.sort_by_key(|f| Reverse(f.published_at())),
        SortOrder::Views => result.sort_by_key(|f| Reverse(f.view_count.unwrap_or(0))),
        SortOrder::Downloads => result.sort_by_key(|f| Reverse(f.download_count.unwrap_or(0))),
        SortOrder::Likes => result.sort_by_key(|f| Reverse(f.like_count.unwrap_or(0))),
    }

    result
}

/// Append a fetched page, skipping ids already present. `reset` replaces the list.
pub fn merge_page(existing: &mut Vec<MediaFile>, page: Vec<MediaFile>, reset: bool) {
    if reset {
        *existing = page;
        return;
    }

    let mut seen: HashSet<String> = existing.iter().map(|f| f.file_id.clone()).collect();
    existing.extend(page.into_iter().filter(|f| seen.insert(f.file_id.clone())));
}

/// Whether another page is likely available.
pub fn has_more(pagination: Option<&Pagination>, page_len: usize, limit: u32) -> bool {
    pagination
        .and_then(|p| p.has_next)
        .unwrap_or(page_len == limit as usize)
}
