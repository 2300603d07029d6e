//! Single media item: detail view, likes, comments, download and reporting.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use leakhere_core::models::{
    Comment, LikeState, MediaFile, NewComment, ReportReason, ReportRequest, Session,
};
use leakhere_core::ports::{CommentsApi, FilesApi, LikesApi, Notice, Notifier, ReportApi};
use leakhere_core::validation::validate_comment_text;
use leakhere_core::CdnUrlRewriter;
use tokio::task::JoinHandle;

use crate::error::ServiceError;

/// Everything shown on the detail page of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaView {
    pub file: MediaFile,
    pub comments: Vec<Comment>,
    pub like: LikeState,
}

/// Where to fetch a file from and what to call it locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub url: String,
    pub file_name: String,
}

pub struct MediaService {
    files: Arc<dyn FilesApi>,
    comments: Arc<dyn CommentsApi>,
    likes: Arc<dyn LikesApi>,
    reports: Arc<dyn ReportApi>,
    notifier: Arc<dyn Notifier>,
    cdn: CdnUrlRewriter,
    tracking: Mutex<Vec<JoinHandle<()>>>,
}

impl MediaService {
    pub fn new(
        files: Arc<dyn FilesApi>,
        comments: Arc<dyn CommentsApi>,
        likes: Arc<dyn LikesApi>,
        reports: Arc<dyn ReportApi>,
        notifier: Arc<dyn Notifier>,
        cdn: CdnUrlRewriter,
    ) -> Self {
        Self {
            files,
            comments,
            likes,
            reports,
            notifier,
            cdn,
            tracking: Mutex::new(Vec::new()),
        }
    }

    /// Load the item, its comments and, with a session, whether the user liked it.
    ///
    /// Comments and like status are best effort; only the file record is required.
    #[tracing::instrument(skip(self, session))]
    pub async fn load(
        &self,
        file_id: &str,
        session: Option<&Session>,
    ) -> Result<MediaView, ServiceError> {
        let (file, comments) = tokio::join!(
            self.files.get_file(file_id),
            self.comments.list_comments(file_id)
        );

        let mut file = match file {
            Ok(Some(file)) => file,
            Ok(None) => {
                self.notifier.notify(Notice::error("Media not found."));
                return Err(ServiceError::NotFound);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load media");
                self.notifier.notify(Notice::error("Failed to load media."));
                return Err(ServiceError::api_with(e, "Failed to load media."));
            }
        };
        file.download_url = file.download_url.map(|u| self.cdn.rewrite(&u));
        file.thumbnail_url = file.thumbnail_url.map(|u| self.cdn.rewrite(&u));

        let comments = comments.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load comments");
            Vec::new()
        });

        let liked = match session {
            Some(session) => self
                .likes
                .check_like(file_id, &session.user_id)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Failed to check like status");
                    false
                }),
            None => false,
        };

        let like = LikeState::new(liked, file.like_count.unwrap_or(0));
        Ok(MediaView { file, comments, like })
    }

    /// Flip the like optimistically; the previous state is restored if the server refuses.
    pub async fn toggle_like(
        &self,
        view: &mut MediaView,
        session: Option<&Session>,
    ) -> Result<LikeState, ServiceError> {
        let session = self.require_session(session, "Please login to like")?;

        let previous = view.like;
        self.apply_like(view, previous.toggled());

        if let Err(e) = self.likes.toggle_like(&view.file.file_id, &session.user_id).await {
            tracing::warn!(error = %e, file_id = %view.file.file_id, "Like toggle failed");
            self.apply_like(view, previous);
            self.notifier.notify(Notice::error("Failed to update like"));
            return Err(ServiceError::api_with(e, "Failed to update like"));
        }

        Ok(view.like)
    }

    fn apply_like(&self, view: &mut MediaView, like: LikeState) {
        view.like = like;
        view.file.like_count = Some(like.like_count);
    }

    pub async fn add_comment(
        &self,
        view: &mut MediaView,
        session: Option<&Session>,
        text: &str,
    ) -> Result<(), ServiceError> {
        let session = self.require_session(session, "Please login to comment")?;
        let Ok(text) = validate_comment_text(text) else {
            return Ok(());
        };

        let comment = self.new_comment(&view.file.file_id, session, text, None);
        if let Err(e) = self.comments.add_comment(&comment).await {
            self.notifier.notify(Notice::error("Failed to add comment"));
            return Err(ServiceError::api_with(e, "Failed to add comment"));
        }

        self.refresh_comments(view).await;
        Ok(())
    }

    pub async fn reply(
        &self,
        view: &mut MediaView,
        session: Option<&Session>,
        parent_comment_id: &str,
        text: &str,
    ) -> Result<(), ServiceError> {
        let session = self.require_session(session, "Please login to reply")?;
        let Ok(text) = validate_comment_text(text) else {
            return Ok(());
        };

        let parent = Some(parent_comment_id.to_string());
        let reply = self.new_comment(&view.file.file_id, session, text, parent);
        if let Err(e) = self.comments.reply(&reply).await {
            self.notifier.notify(Notice::error("Failed to post reply"));
            return Err(ServiceError::api_with(e, "Failed to post reply"));
        }

        self.refresh_comments(view).await;
        Ok(())
    }

    fn new_comment(
        &self,
        file_id: &str,
        session: &Session,
        text: String,
        parent: Option<String>,
    ) -> NewComment {
        NewComment {
            file_id: file_id.to_string(),
            user_id: session.user_id.clone(),
            username: session.username.clone(),
            comment_text: text,
            parent_comment_id: parent,
        }
    }

    async fn refresh_comments(&self, view: &mut MediaView) {
        match self.comments.list_comments(&view.file.file_id).await {
            Ok(comments) => view.comments = comments,
            Err(e) => tracing::warn!(error = %e, "Failed to refresh comments"),
        }
    }

    /// Resolve the download target and record the download in the background.
    pub fn download(&self, view: &mut MediaView) -> Result<Download, ServiceError> {
        let Some(url) = view.file.download_url.clone().filter(|u| !u.is_empty()) else {
            self.notifier.notify(Notice::error("Failed to start download"));
            return Err(ServiceError::NoDownloadUrl);
        };

        let download = Download {
            url: self.cdn.rewrite(&url),
            file_name: view.file.download_file_name(),
        };
        view.file.download_count = Some(view.file.download_count.unwrap_or(0) + 1);

        let files = self.files.clone();
        let file_id = view.file.file_id.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = files.track_download(&file_id).await {
                tracing::warn!(error = %e, file_id = %file_id, "Failed to track download");
            }
        });
        if let Ok(mut tracking) = self.tracking.lock() {
            tracking.retain(|h| !h.is_finished());
            tracking.push(handle);
        }

        self.notifier.notify(Notice::success("Download started"));
        Ok(download)
    }

    /// Wait for background download tracking to finish.
    pub async fn flush(&self) {
        let pending = match self.tracking.lock() {
            Ok(mut tracking) => std::mem::take(&mut *tracking),
            Err(_) => return,
        };
        futures::future::join_all(pending).await;
    }

    #[tracing::instrument(skip(self, session, details))]
    pub async fn report(
        &self,
        file_id: &str,
        session: Option<&Session>,
        reason: Option<ReportReason>,
        details: &str,
    ) -> Result<(), ServiceError> {
        self.require_session(session, "Please login to report content.")?;

        let report = match ReportRequest::new(file_id, reason, details, Utc::now()) {
            Ok(report) => report,
            Err(e) => {
                self.notifier.notify(Notice::error(e.to_string()));
                return Err(e.into());
            }
        };

        if let Err(e) = self.reports.send_report(&report).await {
            let err = ServiceError::api(e, "Failed to submit report.");
            self.notifier.notify(Notice::error(err.to_string()));
            return Err(err);
        }

        tracing::info!("Report submitted");
        self.notifier
            .notify(Notice::success("Report submitted successfully. Thank you."));
        Ok(())
    }

    fn require_session<'a>(
        &self,
        session: Option<&'a Session>,
        message: &'static str,
    ) -> Result<&'a Session, ServiceError> {
        session.ok_or_else(|| {
            self.notifier.notify(Notice::error(message));
            ServiceError::LoginRequired(message)
        })
    }
}
