//! Upload workflow models and the `/upload` + `/confirm-upload` wire shapes.
//!
//! Both endpoints accept either a single unwrapped object or a batch wrapper, and
//! answer with an `isBatch` flag telling which shape the response uses.

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::file_type::FileTypeCategory;
use crate::error::UploadError;

/// Shared text fields of the upload form, applied to every file of a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFormFields {
    pub title: String,
    pub description: String,
    /// Comma-separated.
    pub tags: String,
    pub uploader_name: String,
}

/// Per-file metadata sent to `/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadata {
    #[serde(rename = "originalIndex")]
    pub original_index: usize,
    pub file_name: String,
    pub file_type: FileTypeCategory,
    pub file_extension: String,
    pub file_size: u64,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub uploaded_by: String,
}

/// Body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPayload {
    /// Exactly one file; serialized without `originalIndex`.
    Single(UploadMetadata),
    /// Serialized as `{"files": [...]}`.
    Batch(Vec<UploadMetadata>),
}

impl UploadPayload {
    pub fn from_metadata(mut files: Vec<UploadMetadata>) -> Self {
        if files.len() == 1 {
            UploadPayload::Single(files.remove(0))
        } else {
            UploadPayload::Batch(files)
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, UploadPayload::Batch(_))
    }

    pub fn len(&self) -> usize {
        match self {
            UploadPayload::Single(_) => 1,
            UploadPayload::Batch(files) => files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Serialize)]
struct SingleUploadBody<'a> {
    file_name: &'a str,
    file_type: FileTypeCategory,
    file_extension: &'a str,
    file_size: u64,
    title: &'a str,
    description: &'a str,
    tags: &'a [String],
    uploaded_by: &'a str,
}

#[derive(Serialize)]
struct BatchUploadBody<'a> {
    files: &'a [UploadMetadata],
}

impl Serialize for UploadPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            UploadPayload::Single(meta) => SingleUploadBody {
                file_name: &meta.file_name,
                file_type: meta.file_type,
                file_extension: &meta.file_extension,
                file_size: meta.file_size,
                title: &meta.title,
                description: &meta.description,
                tags: &meta.tags,
                uploaded_by: &meta.uploaded_by,
            }
            .serialize(serializer),
            UploadPayload::Batch(files) => BatchUploadBody { files }.serialize(serializer),
        }
    }
}

/// One entry of a batch `/upload` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResponse {
    #[serde(rename = "originalIndex")]
    pub original_index: usize,
    #[serde(default)]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub share_link: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /upload`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "isBatch", default)]
    pub is_batch: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SlotResponse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

const MISSING_UPLOAD_URL: &str = "No upload URL returned";
const INITIATE_FAILED: &str = "Failed to initiate upload(s).";
const INVALID_URL_RESPONSE: &str = "Invalid URL response format from upload endpoint.";

impl UploadResponse {
    /// Normalize both response shapes into one slot per returned entry.
    ///
    /// Fails with `RequestFailure` when the server reports failure or the body matches
    /// neither shape.
    pub fn into_slots(self) -> Result<Vec<UploadSlot>, UploadError> {
        if !self.success {
            let reason = self
                .message
                .or(self.error)
                .unwrap_or_else(|| INITIATE_FAILED.to_string());
            return Err(UploadError::RequestFailure(reason));
        }

        match (self.is_batch, self.results) {
            (true, Some(results)) => Ok(results.into_iter().map(UploadSlot::from).collect()),
            (false, _) if self.upload_url.is_some() && self.file_id.is_some() => {
                Ok(vec![UploadSlot::from(SlotResponse {
                    original_index: 0,
                    upload_url: self.upload_url,
                    file_id: self.file_id,
                    share_link: self.share_link,
                    error: None,
                })])
            }
            _ => Err(UploadError::RequestFailure(
                INVALID_URL_RESPONSE.to_string(),
            )),
        }
    }
}

/// Server-issued upload target for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlot {
    pub original_index: usize,
    pub upload_url: Option<String>,
    pub file_id: Option<String>,
    pub share_link: Option<String>,
    pub error: Option<String>,
    pub success: bool,
}

impl From<SlotResponse> for UploadSlot {
    fn from(resp: SlotResponse) -> Self {
        let usable = resp.error.is_none() && resp.upload_url.is_some() && resp.file_id.is_some();
        let error = match (&resp.error, usable) {
            (Some(err), _) => Some(err.clone()),
            (None, false) => Some(
                UploadError::SlotFailure(MISSING_UPLOAD_URL.to_string()).to_string(),
            ),
            (None, true) => None,
        };
        Self {
            original_index: resp.original_index,
            upload_url: resp.upload_url,
            file_id: resp.file_id,
            share_link: resp.share_link,
            error,
            success: usable,
        }
    }
}

/// Body of `POST /confirm-upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfirmPayload {
    Single { file_id: String },
    Batch { file_ids: Vec<String> },
}

impl ConfirmPayload {
    pub fn new(mut file_ids: Vec<String>, batch: bool) -> Self {
        if !batch && file_ids.len() == 1 {
            ConfirmPayload::Single {
                file_id: file_ids.remove(0),
            }
        } else {
            ConfirmPayload::Batch { file_ids }
        }
    }

    pub fn file_ids(&self) -> Vec<&str> {
        match self {
            ConfirmPayload::Single { file_id } => vec![file_id.as_str()],
            ConfirmPayload::Batch { file_ids } => file_ids.iter().map(String::as_str).collect(),
        }
    }
}

/// One entry of a batch `/confirm-upload` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmResult {
    pub file_id: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub share_link: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub file: Option<JsonValue>,
}

/// Response of `POST /confirm-upload`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "isBatch", default)]
    pub is_batch: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ConfirmResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConfirmResponse {
    /// Share link of a single-file confirmation, from the top level or the `file` record.
    pub fn single_share_link(&self) -> Option<String> {
        self.share_link.clone().or_else(|| {
            self.file
                .as_ref()
                .and_then(|f| f.get("share_link"))
                .and_then(JsonValue::as_str)
                .map(str::to_string)
        })
    }

    /// File id of a single-file confirmation, from the top level or the `file` record.
    pub fn single_file_id(&self) -> Option<String> {
        self.file_id.clone().or_else(|| {
            self.file
                .as_ref()
                .and_then(|f| f.get("file_id"))
                .and_then(JsonValue::as_str)
                .map(str::to_string)
        })
    }
}

/// Final outcome for one selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    #[serde(rename = "originalIndex")]
    pub original_index: usize,
    pub name: String,
    pub title: String,
    pub success: bool,
    pub link: Option<String>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl UploadResult {
    pub fn failed(meta: &UploadMetadata, error: impl Into<String>) -> Self {
        Self {
            original_index: meta.original_index,
            name: meta.file_name.clone(),
            title: meta.title.clone(),
            success: false,
            link: None,
            error: Some(error.into()),
            file_id: None,
        }
    }

    pub fn from_slot(meta: &UploadMetadata, slot: Option<&UploadSlot>) -> Self {
        match slot {
            Some(slot) => Self {
                original_index: meta.original_index,
                name: meta.file_name.clone(),
                title: meta.title.clone(),
                success: slot.success,
                link: slot.share_link.clone().filter(|_| slot.success),
                error: slot.error.clone(),
                file_id: slot.file_id.clone(),
            },
            None => Self::failed(
                meta,
                UploadError::SlotFailure(MISSING_UPLOAD_URL.to_string()).to_string(),
            ),
        }
    }

    /// Downgrade a pending success. Results that already failed keep their first reason.
    pub fn downgrade(&mut self, reason: impl Into<String>) {
        if self.success {
            self.success = false;
            self.link = None;
            self.error = Some(reason.into());
        }
    }
}
