//! Batch upload workflow and its result summary.

pub mod orchestrator;
pub mod reporter;

pub use orchestrator::{
    ProgressObserver, ProgressSnapshot, SubmitError, UploadOrchestrator, UploadSummary,
};
pub use reporter::{ResultEntry, ResultReporter};
