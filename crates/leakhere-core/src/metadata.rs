//! Builds the per-file metadata sent with an upload request.
//!
//! Everything here is pure: the same files, form fields and session always yield the
//! same metadata.

use crate::constants::ANONYMOUS_UPLOADER;
use crate::models::{FileTypeCategory, SelectedFile, Session, UploadFormFields, UploadMetadata};

/// One metadata record per file, indexed by position in `files`.
pub fn build_upload_metadata(
    files: &[SelectedFile],
    form: &UploadFormFields,
    category: FileTypeCategory,
    session: Option<&Session>,
) -> Vec<UploadMetadata> {
    let is_batch = files.len() > 1;
    let description = form.description.trim().to_string();
    let tags = parse_tags(&form.tags);
    let uploaded_by = resolve_uploader(&form.uploader_name, session);

    files
        .iter()
        .enumerate()
        .map(|(index, file)| UploadMetadata {
            original_index: index,
            file_name: file.name.clone(),
            file_type: category,
            file_extension: file.extension(),
            file_size: file.size,
            title: derive_title(&form.title, file, index, is_batch),
            description: description.clone(),
            tags: tags.clone(),
            uploaded_by: uploaded_by.clone(),
        })
        .collect()
}

/// Shared title if set, else the file stem; batches get a 1-based ` (n)` suffix.
pub fn derive_title(
    shared_title: &str,
    file: &SelectedFile,
    index: usize,
    is_batch: bool,
) -> String {
    let shared = shared_title.trim();
    let base = if shared.is_empty() { file.stem() } else { shared };

    if is_batch {
        format!("{} ({})", base, index + 1)
    } else {
        base.to_string()
    }
}

/// Split a comma-separated tag field, dropping blank entries.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Form value, then session username, then `"Anonymous"`.
pub fn resolve_uploader(form_value: &str, session: Option<&Session>) -> String {
    let explicit = form_value.trim();
    if !explicit.is_empty() {
        return explicit.to_string();
    }

    session
        .map(|s| s.username.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(ANONYMOUS_UPLOADER)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn file(name: &str, size: u64) -> SelectedFile {
        SelectedFile::from_bytes(name, "video/mp4", vec![0u8; size as usize])
    }

    fn session() -> Session {
        Session {
            username: "ana".to_string(),
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn single_file_blank_title_uses_stem() {
        let files = vec![SelectedFile::from_bytes("sunset.PNG", "image/png", vec![1, 2, 3])];
        let meta = build_upload_metadata(
            &files,
            &UploadFormFields::default(),
            FileTypeCategory::Images,
            None,
        );

        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].title, "sunset");
        assert_eq!(meta[0].file_extension, "png");
        assert_eq!(meta[0].file_size, 3);
        assert_eq!(meta[0].file_type, FileTypeCategory::Images);
        assert_eq!(meta[0].uploaded_by, "Anonymous");
        assert!(meta[0].tags.is_empty());
    }

    #[test]
    fn dotless_name_is_its_own_extension() {
        let files = vec![SelectedFile::from_bytes("Makefile", "text/plain", vec![1])];
        let meta = build_upload_metadata(
            &files,
            &UploadFormFields::default(),
            FileTypeCategory::Documents,
            None,
        );

        assert_eq!(meta[0].title, "Makefile");
        assert_eq!(meta[0].file_extension, "makefile");
    }

    #[test]
    fn batch_with_shared_title_gets_suffixes() {
        let files = vec![file("a.mp4", 1), file("b.mp4", 2)];
        let form = UploadFormFields {
            title: "  Trip ".to_string(),
            ..Default::default()
        };
        let meta = build_upload_metadata(&files, &form, FileTypeCategory::Videos, None);

        let titles: Vec<_> = meta.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Trip (1)", "Trip (2)"]);
        assert_eq!(meta[1].original_index, 1);
    }

    #[test]
    fn batch_titles_are_pairwise_distinct() {
        let files = vec![
            file("clip.mp4", 1),
            file("clip.webm", 2),
            file("clip (2).mp4", 3),
            file("clip", 4),
        ];
        for shared in ["", "Same"] {
            let form = UploadFormFields {
                title: shared.to_string(),
                ..Default::default()
            };
            let meta = build_upload_metadata(&files, &form, FileTypeCategory::Videos, None);
            let unique: HashSet<_> = meta.iter().map(|m| m.title.clone()).collect();
            assert_eq!(unique.len(), files.len(), "titles collided for {shared:?}");
        }
    }

    #[test]
    fn tags_are_split_and_trimmed() {
        assert_eq!(
            parse_tags(" beach, , sunset ,,night "),
            vec!["beach", "sunset", "night"]
        );
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn uploader_fallback_chain() {
        assert_eq!(resolve_uploader(" bob ", Some(&session())), "bob");
        assert_eq!(resolve_uploader("  ", Some(&session())), "ana");
        assert_eq!(resolve_uploader("", None), "Anonymous");
    }

    #[test]
    fn description_is_trimmed_and_shared() {
        let files = vec![file("a.mp4", 1), file("b.mp4", 1)];
        let form = UploadFormFields {
            description: "  road trip \n".to_string(),
            tags: "cars,roads".to_string(),
            ..Default::default()
        };
        let meta = build_upload_metadata(&files, &form, FileTypeCategory::Videos, Some(&session()));
        for m in &meta {
            assert_eq!(m.description, "road trip");
            assert_eq!(m.tags, vec!["cars", "roads"]);
            assert_eq!(m.uploaded_by, "ana");
        }
    }

    #[test]
    fn deterministic() {
        let files = vec![file("a.mp4", 1), file("b.mp4", 1)];
        let form = UploadFormFields::default();
        assert_eq!(
            build_upload_metadata(&files, &form, FileTypeCategory::Videos, None),
            build_upload_metadata(&files, &form, FileTypeCategory::Videos, None)
        );
    }
}
