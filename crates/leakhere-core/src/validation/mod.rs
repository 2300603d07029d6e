//! Validation modules

pub mod file;
pub mod input;

pub use file::{FileRejection, FileSelection, FileValidator, RejectedFile, SelectionOutcome};
pub use input::{validate_comment_text, validate_credentials, validate_registration, InputError};
