//! Domain endpoints of the LeakHere API, exposed through the `leakhere_core::ports` traits.

use async_trait::async_trait;
use leakhere_core::models::{
    AuthResponse, Comment, CommentsResponse, ConfirmPayload, ConfirmResponse, Credentials,
    FilesPage, FilesQuery, LikeCheckResponse, LikeToggleRequest, MediaFile, NewComment,
    ReportRequest, Session, TrackDownloadRequest, UploadPayload, UploadResponse, ViewResponse,
};
use leakhere_core::ports::{AuthApi, CommentsApi, FilesApi, LikesApi, ReportApi, UploadApi};
use leakhere_core::ApiError;

use crate::ApiClient;

impl ApiClient {
    async fn authenticate(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<Session, ApiError> {
        let response: AuthResponse = self.post_json(path, credentials).await?;
        response.into_session().ok_or_else(|| {
            ApiError::Decode("Auth response is missing username or user_id".to_string())
        })
    }
}

#[async_trait]
impl UploadApi for ApiClient {
    async fn request_upload(&self, payload: &UploadPayload) -> Result<UploadResponse, ApiError> {
        tracing::debug!(
            file_count = payload.len(),
            is_batch = payload.is_batch(),
            "Requesting upload URLs"
        );
        self.post_json("/upload", payload).await
    }

    async fn confirm_upload(&self, payload: &ConfirmPayload) -> Result<ConfirmResponse, ApiError> {
        tracing::debug!(file_ids = ?payload.file_ids(), "Confirming uploads");
        self.post_json("/confirm-upload", payload).await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn register(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        self.authenticate("/auth", credentials).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        self.authenticate("/auth/login", credentials).await
    }
}

#[async_trait]
impl FilesApi for ApiClient {
    async fn list_files(&self, query: &FilesQuery) -> Result<FilesPage, ApiError> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        self.get("/files", &params).await
    }

    async fn get_file(&self, file_id: &str) -> Result<Option<MediaFile>, ApiError> {
        let response: ViewResponse = self.get("/view", &[("id", file_id.to_string())]).await?;
        Ok(response.file)
    }

    async fn track_download(&self, file_id: &str) -> Result<(), ApiError> {
        let body = TrackDownloadRequest {
            file_id: file_id.to_string(),
        };
        self.post_no_content("/track-download", &body).await
    }
}

#[async_trait]
impl CommentsApi for ApiClient {
    async fn list_comments(&self, file_id: &str) -> Result<Vec<Comment>, ApiError> {
        let response: CommentsResponse = self
            .get("/comments", &[("file_id", file_id.to_string())])
            .await?;
        Ok(response.comments)
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<(), ApiError> {
        self.post_no_content("/comments/add", comment).await
    }

    async fn reply(&self, reply: &NewComment) -> Result<(), ApiError> {
        self.post_no_content("/comments/reply", reply).await
    }
}

#[async_trait]
impl LikesApi for ApiClient {
    async fn check_like(&self, file_id: &str, user_id: &str) -> Result<bool, ApiError> {
        let response: LikeCheckResponse = self
            .get(
                "/likes/check",
                &[("file_id", file_id.to_string()), ("user_id", user_id.to_string())],
            )
            .await?;
        Ok(response.liked)
    }

    async fn toggle_like(&self, file_id: &str, user_id: &str) -> Result<(), ApiError> {
        let body = LikeToggleRequest {
            file_id: file_id.to_string(),
            user_id: user_id.to_string(),
        };
        self.post_no_content("/likes/toggle", &body).await
    }
}

#[async_trait]
impl ReportApi for ApiClient {
    async fn send_report(&self, report: &ReportRequest) -> Result<(), ApiError> {
        self.post_no_content("/report", report).await
    }
}
