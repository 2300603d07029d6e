//! Side-effect traits
//!
//! The services layer talks to the network, the clipboard, the share sheet and session
//! storage only through these traits. `leakhere-api-client` implements the API ports;
//! the CLI implements the platform ones. Tests substitute fakes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ApiError, SessionError};
use crate::models::{
    Comment, ConfirmPayload, ConfirmResponse, Credentials, FilesPage, FilesQuery, MediaFile,
    NewComment, ReportRequest, SelectedFile, Session, UploadPayload, UploadResponse,
};

/// Receives upload progress for one file as a percentage (0..=100).
///
/// Called from whatever task drives the request body, so it must be thread-safe.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// `/upload` and `/confirm-upload`.
#[async_trait]
pub trait UploadApi: Send + Sync {
    async fn request_upload(&self, payload: &UploadPayload) -> Result<UploadResponse, ApiError>;

    async fn confirm_upload(&self, payload: &ConfirmPayload) -> Result<ConfirmResponse, ApiError>;
}

/// Direct binary upload against a presigned URL.
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    /// PUT the file's bytes to `upload_url` with its MIME type as `Content-Type`.
    /// Any 2xx is success.
    async fn put_object(
        &self,
        upload_url: &str,
        file: &SelectedFile,
        on_progress: ProgressCallback,
    ) -> Result<(), ApiError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, credentials: &Credentials) -> Result<Session, ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError>;
}

#[async_trait]
pub trait FilesApi: Send + Sync {
    async fn list_files(&self, query: &FilesQuery) -> Result<FilesPage, ApiError>;

    /// `Ok(None)` when the API answers without a file record.
    async fn get_file(&self, file_id: &str) -> Result<Option<MediaFile>, ApiError>;

    async fn track_download(&self, file_id: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait CommentsApi: Send + Sync {
    async fn list_comments(&self, file_id: &str) -> Result<Vec<Comment>, ApiError>;

    async fn add_comment(&self, comment: &NewComment) -> Result<(), ApiError>;

    async fn reply(&self, reply: &NewComment) -> Result<(), ApiError>;
}

#[async_trait]
pub trait LikesApi: Send + Sync {
    async fn check_like(&self, file_id: &str, user_id: &str) -> Result<bool, ApiError>;

    async fn toggle_like(&self, file_id: &str, user_id: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait ReportApi: Send + Sync {
    async fn send_report(&self, report: &ReportRequest) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Share cancelled")]
    Cancelled,

    #[error("Share failed: {0}")]
    Failed(String),
}

/// Native share capability.
#[async_trait]
pub trait ShareSheet: Send + Sync {
    fn is_available(&self) -> bool;

    async fn share(&self, title: &str, url: &str) -> Result<(), ShareError>;
}

/// Persistence for the logged-in session.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, SessionError>;

    fn save(&self, session: &Session) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}
