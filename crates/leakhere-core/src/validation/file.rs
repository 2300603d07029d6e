//! Selection-time file checks.
//!
//! Only the reported metadata (MIME type, size, name) is looked at, so these checks are
//! advisory: the API and object store enforce their own limits.

use crate::constants::MB;
use crate::error::UploadError;
use crate::models::{FileTypeCategory, SelectedFile};

/// Why a file was refused for the active category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileRejection {
    #[error("Invalid type")]
    InvalidType {
        mime_type: String,
        category: FileTypeCategory,
    },

    #[error("Too large")]
    TooLarge { size: u64, max: u64 },
}

impl FileRejection {
    /// Longer explanation for notices.
    pub fn detail(&self) -> String {
        match self {
            FileRejection::InvalidType {
                mime_type,
                category,
            } => {
                let shown = if mime_type.is_empty() {
                    "unknown"
                } else {
                    mime_type
                };
                format!("Invalid type ({}) for '{}'", shown, category)
            }
            FileRejection::TooLarge { max, .. } => {
                format!("File too large (Max {}MB)", max / MB)
            }
        }
    }
}

/// Checks files against one category's allow-list and size cap.
#[derive(Debug, Clone, Copy)]
pub struct FileValidator {
    category: FileTypeCategory,
}

impl FileValidator {
    pub fn new(category: FileTypeCategory) -> Self {
        Self { category }
    }

    pub fn validate_content_type(&self, mime_type: &str) -> Result<(), FileRejection> {
        if !self.category.accepts_mime(mime_type) {
            return Err(FileRejection::InvalidType {
                mime_type: mime_type.to_string(),
                category: self.category,
            });
        }
        Ok(())
    }

    pub fn validate_file_size(&self, size: u64) -> Result<(), FileRejection> {
        let max = self.category.max_file_size();
        if size > max {
            return Err(FileRejection::TooLarge { size, max });
        }
        Ok(())
    }

    /// Type is checked before size, so a wrong-typed oversize file reports `Invalid type`.
    pub fn validate(&self, file: &SelectedFile) -> Result<(), FileRejection> {
        self.validate_content_type(&file.mime_type)?;
        self.validate_file_size(file.size)?;
        Ok(())
    }
}

/// A file refused at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub name: String,
    pub rejection: FileRejection,
}

impl RejectedFile {
    pub fn notice_message(&self) -> String {
        let name = if self.name.is_empty() {
            "Unnamed file"
        } else {
            &self.name
        };
        format!("{}: {}", name, self.rejection.detail())
    }
}

impl From<RejectedFile> for UploadError {
    fn from(rejected: RejectedFile) -> Self {
        UploadError::ValidationRejection {
            name: rejected.name,
            rejection: rejected.rejection,
        }
    }
}

/// What happened to one batch of newly chosen files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub added: usize,
    /// Valid files dropped because the same (name, size) was already selected.
    pub duplicates: usize,
    pub rejected: Vec<RejectedFile>,
}

/// Files pending submission.
#[derive(Debug, Clone, Default)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
}

impl FileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `incoming` against `category` and append the files that pass and are not
    /// already selected.
    pub fn add(
        &mut self,
        incoming: Vec<SelectedFile>,
        category: FileTypeCategory,
    ) -> SelectionOutcome {
        let validator = FileValidator::new(category);
        let mut outcome = SelectionOutcome::default();

        for file in incoming {
            if let Err(rejection) = validator.validate(&file) {
                tracing::debug!(
                    file_name = %file.name,
                    mime_type = %file.mime_type,
                    size = file.size,
                    reason = %rejection,
                    "File rejected"
                );
                outcome.rejected.push(RejectedFile {
                    name: file.name,
                    rejection,
                });
                continue;
            }

            if self.contains(&file) {
                tracing::debug!(file_name = %file.name, size = file.size, "Duplicate file skipped");
                outcome.duplicates += 1;
                continue;
            }

            self.files.push(file);
            outcome.added += 1;
        }

        outcome
    }

    pub fn contains(&self, file: &SelectedFile) -> bool {
        self.files
            .iter()
            .any(|existing| existing.signature() == file.signature())
    }

    pub fn remove(&mut self, index: usize) -> Option<SelectedFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn file(name: &str, mime: &str, size: u64) -> SelectedFile {
        SelectedFile {
            name: name.to_string(),
            size,
            mime_type: mime.to_string(),
            last_modified: None,
            source: crate::models::FileSource::Memory(Bytes::new()),
        }
    }

    #[test]
    fn test_validate_content_type() {
        let validator = FileValidator::new(FileTypeCategory::Images);
        assert!(validator.validate_content_type("image/png").is_ok());
        assert!(matches!(
            validator.validate_content_type("video/mp4"),
            Err(FileRejection::InvalidType { .. })
        ));
    }

    #[test]
    fn test_validate_file_size_boundary() {
        let validator = FileValidator::new(FileTypeCategory::Images);
        assert!(validator.validate_file_size(10 * MB).is_ok());
        assert_eq!(
            validator.validate_file_size(10 * MB + 1),
            Err(FileRejection::TooLarge {
                size: 10 * MB + 1,
                max: 10 * MB
            })
        );

        let videos = FileValidator::new(FileTypeCategory::Videos);
        assert!(videos.validate_file_size(50 * MB).is_ok());
        assert!(videos.validate_file_size(101 * MB).is_err());
    }

    #[test]
    fn test_type_checked_before_size() {
        let validator = FileValidator::new(FileTypeCategory::Gifs);
        let err = validator
            .validate(&file("big.png", "image/png", 50 * MB))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid type");
    }

    #[test]
    fn test_rejections_do_not_block_valid_files() {
        let mut selection = FileSelection::new();
        let outcome = selection.add(
            vec![
                file("a.png", "image/png", MB),
                file("b.mp4", "video/mp4", MB),
                file("c.jpg", "image/jpeg", 11 * MB),
                file("d.webp", "image/webp", MB),
            ],
            FileTypeCategory::Images,
        );

        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(outcome.rejected[0].name, "b.mp4");
        assert_eq!(outcome.rejected[0].rejection.to_string(), "Invalid type");
        assert_eq!(outcome.rejected[1].rejection.to_string(), "Too large");
        let names: Vec<_> = selection.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "d.webp"]);
    }

    #[test]
    fn test_reselecting_same_file_is_noop() {
        let mut selection = FileSelection::new();
        selection.add(vec![file("a.png", "image/png", 100)], FileTypeCategory::Images);
        let outcome = selection.add(
            vec![
                file("a.png", "image/png", 100),
                file("a.png", "image/png", 101),
            ],
            FileTypeCategory::Images,
        );

        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.added, 1);
        assert!(outcome.rejected.is_empty());
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_duplicates_within_one_batch() {
        let mut selection = FileSelection::new();
        let outcome = selection.add(
            vec![file("a.gif", "image/gif", 5), file("a.gif", "image/gif", 5)],
            FileTypeCategory::Gifs,
        );
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.duplicates, 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut selection = FileSelection::new();
        selection.add(
            vec![file("a.pdf", "application/pdf", 5), file("b.txt", "text/plain", 7)],
            FileTypeCategory::Documents,
        );
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.remove(0).map(|f| f.name), Some("a.pdf".to_string()));
        assert!(selection.remove(5).is_none());
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_notice_messages() {
        let rejected = RejectedFile {
            name: String::new(),
            rejection: FileRejection::InvalidType {
                mime_type: String::new(),
                category: FileTypeCategory::Videos,
            },
        };
        assert_eq!(
            rejected.notice_message(),
            "Unnamed file: Invalid type (unknown) for 'videos'"
        );

        let rejected = RejectedFile {
            name: "huge.mp4".to_string(),
            rejection: FileRejection::TooLarge {
                size: 200 * MB,
                max: 100 * MB,
            },
        };
        assert_eq!(
            rejected.notice_message(),
            "huge.mp4: File too large (Max 100MB)"
        );
        let err: UploadError = rejected.into();
        assert_eq!(err.to_string(), "huge.mp4: Too large");
    }
}
