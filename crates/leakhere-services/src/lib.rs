//! LeakHere Services
//!
//! Application workflows on top of the `leakhere_core::ports` traits: the batch upload
//! orchestrator and its result reporter, account management, the gallery feed and the
//! media detail actions (likes, comments, downloads, reports).
//!
//! Every service takes its collaborators as `Arc<dyn Trait>`, so the same code runs
//! against the HTTP client in the CLI and against in-memory fakes in tests.

pub mod account;
pub mod error;
pub mod feed;
pub mod media;
pub mod upload;

#[cfg(test)]
mod test_helpers;

pub use account::AccountService;
pub use error::ServiceError;
pub use feed::GalleryFeed;
pub use media::{Download, MediaService, MediaView};
pub use upload::{
    ProgressObserver, ProgressSnapshot, ResultEntry, ResultReporter, SubmitError,
    UploadOrchestrator, UploadSummary,
};
