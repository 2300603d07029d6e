//! Error types module
//!
//! `ApiError` covers every failure talking to the LeakHere API or the object store.
//! `UploadError` is the taxonomy of the upload workflow; the orchestrator converts each
//! variant into the `error` string of an upload result instead of propagating it.

use std::io;

use crate::validation::FileRejection;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, DNS or TLS failure before a response was received.
    #[error("Failed to send request: {0}")]
    Transport(String),

    /// Non-2xx response. `message` is the server's `message` field when present.
    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] io::Error),
}

impl ApiError {
    /// Message suitable for a user-visible notice.
    ///
    /// Prefers what the server said over transport detail.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Failures of one upload submission, by phase.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// A file failed the category type/size check at selection time.
    #[error("{name}: {rejection}")]
    ValidationRejection {
        name: String,
        rejection: FileRejection,
    },

    /// The metadata request failed outright or came back malformed. Aborts the submission.
    #[error("{0}")]
    RequestFailure(String),

    /// One file came back from the metadata request without an upload target.
    #[error("{0}")]
    SlotFailure(String),

    /// The direct PUT to object storage failed for one file.
    #[error("S3 upload failed")]
    ObjectUploadFailure,

    #[error("{0}")]
    ConfirmationFailure(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Io(#[from] io::Error),

    #[error("Stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
