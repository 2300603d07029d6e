//! Presents upload results and the copy/share actions on their links.

use std::sync::Arc;

use leakhere_core::ports::{Clipboard, Notice, Notifier, ShareError, ShareSheet};

use super::orchestrator::UploadSummary;

const LINK_COPIED: &str = "Link copied!";
const COPY_FAILED: &str = "Failed to copy link";
const SHARE_FAILED: &str = "Could not share link.";
const DEFAULT_SHARE_TITLE: &str = "Shared File";

/// One row of the upload summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry<'a> {
    pub display_name: &'a str,
    pub success: bool,
    /// Present only for successful uploads.
    pub link: Option<&'a str>,
    /// Present only for failed uploads.
    pub error: Option<&'a str>,
}

pub struct ResultReporter {
    clipboard: Arc<dyn Clipboard>,
    share_sheet: Arc<dyn ShareSheet>,
    notifier: Arc<dyn Notifier>,
}

impl ResultReporter {
    pub fn new(
        clipboard: Arc<dyn Clipboard>,
        share_sheet: Arc<dyn ShareSheet>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            clipboard,
            share_sheet,
            notifier,
        }
    }

    pub fn entries(summary: &UploadSummary) -> Vec<ResultEntry<'_>> {
        summary
            .results
            .iter()
            .map(|r| ResultEntry {
                display_name: if r.name.is_empty() { r.title.as_str() } else { r.name.as_str() },
                success: r.success,
                link: r.link.as_deref().filter(|_| r.success),
                error: if r.success {
                    None
                } else {
                    Some(r.error.as_deref().unwrap_or("Upload failed"))
                },
            })
            .collect()
    }

    /// Copy `link` to the clipboard. Outcome is reported through a notice.
    pub async fn copy_link(&self, link: &str) {
        if link.is_empty() {
            return;
        }
        match self.clipboard.write_text(link).await {
            Ok(()) => self.notifier.notify(Notice::success(LINK_COPIED)),
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard write failed");
                self.notifier.notify(Notice::error(COPY_FAILED));
            }
        }
    }

    /// Share `link` natively, falling back to copying it. A cancelled share is silent.
    pub async fn share(&self, title: &str, link: &str) {
        if link.is_empty() {
            return;
        }
        if !self.share_sheet.is_available() {
            self.copy_link(link).await;
            return;
        }

        let title = if title.trim().is_empty() {
            DEFAULT_SHARE_TITLE
        } else {
            title
        };
        match self.share_sheet.share(title, link).await {
            Ok(()) | Err(ShareError::Cancelled) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Share failed");
                self.notifier.notify(Notice::error(SHARE_FAILED));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockClipboard, MockShareSheet, RecordingNotifier, ShareBehavior};
    use leakhere_core::models::UploadResult;

    fn build(
        clipboard: MockClipboard,
        behavior: ShareBehavior,
    ) -> (
        ResultReporter,
        Arc<MockClipboard>,
        Arc<MockShareSheet>,
        Arc<RecordingNotifier>,
    ) {
        let clipboard = Arc::new(clipboard);
        let share = Arc::new(MockShareSheet::new(behavior));
        let notifier = RecordingNotifier::new();
        let reporter = ResultReporter::new(clipboard.clone(), share.clone(), notifier.clone());
        (reporter, clipboard, share, notifier)
    }

    fn result(name: &str, success: bool, link: Option<&str>, error: Option<&str>) -> UploadResult {
        UploadResult {
            original_index: 0,
            name: name.to_string(),
            title: "Title".to_string(),
            success,
            link: link.map(str::to_string),
            error: error.map(str::to_string),
            file_id: None,
        }
    }

    #[test]
    fn entries_show_link_only_on_success() {
        let summary = UploadSummary {
            results: vec![
                result("a.png", true, Some("https://l/a"), None),
                result("b.png", false, Some("https://l/b"), Some("S3 upload failed")),
                result("", false, None, None),
            ],
        };
        let entries = ResultReporter::entries(&summary);

        assert_eq!(entries[0].link, Some("https://l/a"));
        assert_eq!(entries[0].error, None);
        assert_eq!(entries[1].link, None);
        assert_eq!(entries[1].error, Some("S3 upload failed"));
        assert_eq!(entries[2].display_name, "Title");
        assert_eq!(entries[2].error, Some("Upload failed"));
    }

    #[tokio::test]
    async fn copy_reports_success_and_failure() {
        let (reporter, clipboard, _, notifier) =
            build(MockClipboard::default(), ShareBehavior::Succeed);
        reporter.copy_link("https://l/a").await;
        reporter.copy_link("").await;
        assert_eq!(clipboard.contents.lock().unwrap().clone(), vec!["https://l/a"]);
        assert_eq!(notifier.messages(), vec!["Link copied!"]);

        let broken = MockClipboard {
            broken: true,
            ..Default::default()
        };
        let (reporter, _, _, notifier) = build(broken, ShareBehavior::Succeed);
        reporter.copy_link("https://l/a").await;
        assert_eq!(notifier.messages(), vec!["Failed to copy link"]);
    }

    #[tokio::test]
    async fn share_falls_back_to_copy() {
        let (reporter, clipboard, share, notifier) =
            build(MockClipboard::default(), ShareBehavior::Unavailable);
        reporter.share("Trip (1)", "https://l/a").await;

        assert!(share.shared.lock().unwrap().is_empty());
        assert_eq!(clipboard.contents.lock().unwrap().len(), 1);
        assert_eq!(notifier.messages(), vec!["Link copied!"]);
    }

    #[tokio::test]
    async fn share_uses_default_title_and_is_silent() {
        let (reporter, _, share, notifier) =
            build(MockClipboard::default(), ShareBehavior::Succeed);
        reporter.share("  ", "https://l/a").await;

        assert_eq!(
            share.shared.lock().unwrap()[0],
            ("Shared File".to_string(), "https://l/a".to_string())
        );
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn cancelled_share_is_silent_but_failure_is_not() {
        let (reporter, _, _, notifier) = build(MockClipboard::default(), ShareBehavior::Cancel);
        reporter.share("t", "https://l/a").await;
        assert!(notifier.notices().is_empty());

        let (reporter, _, _, notifier) = build(MockClipboard::default(), ShareBehavior::Fail);
        reporter.share("t", "https://l/a").await;
        assert_eq!(notifier.messages(), vec!["Could not share link."]);
    }
}
