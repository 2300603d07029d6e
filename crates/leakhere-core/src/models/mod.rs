//! Data models for the client
//!
//! Each sub-module covers one feature area. Wire shapes use the field names of the
//! LeakHere API (snake_case, with a couple of camelCase keys such as `originalIndex`
//! and `isBatch`).

mod comment;
mod file_type;
mod likes;
mod media;
mod report;
mod selected_file;
pub mod upload;
mod user;

// Re-export all models for convenient imports
pub use comment::*;
pub use file_type::*;
pub use likes::*;
pub use media::*;
pub use report::*;
pub use selected_file::*;
pub use upload::*;
pub use user::*;
