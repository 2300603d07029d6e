//! LeakHere Core Library
//!
//! This crate provides the domain models, error types, configuration, validation and
//! pure upload helpers (metadata building, progress aggregation) shared by the API
//! client, the services layer and the CLI.
//!
//! Nothing in this crate performs I/O against the LeakHere API. Side effects are
//! expressed as traits in [`ports`] and implemented by the outer crates.

pub mod cdn_url;
pub mod config;
pub mod constants;
pub mod error;
pub mod gallery;
pub mod metadata;
pub mod models;
pub mod ports;
pub mod progress;
pub mod validation;

// Re-export commonly used types
pub use cdn_url::CdnUrlRewriter;
pub use config::ClientConfig;
pub use error::{ApiError, SessionError, UploadError};
pub use metadata::build_upload_metadata;
pub use progress::{overall_progress, ProgressTracker, UploadPhase};
pub use validation::{FileRejection, FileSelection, FileValidator, InputError};
