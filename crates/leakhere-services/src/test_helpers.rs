//! In-memory port implementations for testing
//!
//! These fakes let the services be exercised without a network, a clipboard or a disk.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use leakhere_core::models::{
    Comment, ConfirmPayload, ConfirmResponse, Credentials, FilesPage, FilesQuery, MediaFile,
    NewComment, ReportRequest, SelectedFile, Session, UploadPayload, UploadResponse,
};
use leakhere_core::ports::{
    AuthApi, Clipboard, CommentsApi, FilesApi, LikesApi, Notice, Notifier, ObjectUploader,
    ProgressCallback, ReportApi, SessionStore, ShareError, ShareSheet, UploadApi,
};
use leakhere_core::{ApiError, SessionError};

type Reply<T> = Box<dyn Fn() -> Result<T, ApiError> + Send + Sync>;

pub fn server_error(message: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        message: message.to_string(),
    }
}

pub fn network_error() -> ApiError {
    ApiError::Transport("connection reset".to_string())
}

/// Records notices in order.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct MockUploadApi {
    upload: Reply<UploadResponse>,
    confirm: Reply<ConfirmResponse>,
    pub upload_requests: Mutex<Vec<UploadPayload>>,
    pub confirm_requests: Mutex<Vec<ConfirmPayload>>,
}

impl MockUploadApi {
    pub fn new(upload: UploadResponse, confirm: ConfirmResponse) -> Self {
        Self {
            upload: Box::new(move || Ok(upload.clone())),
            confirm: Box::new(move || Ok(confirm.clone())),
            upload_requests: Mutex::new(Vec::new()),
            confirm_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_upload(error: fn() -> ApiError) -> Self {
        let mut api = Self::new(UploadResponse::default(), ConfirmResponse::default());
        api.upload = Box::new(move || Err(error()));
        api
    }

    pub fn with_confirm_error(mut self, error: fn() -> ApiError) -> Self {
        self.confirm = Box::new(move || Err(error()));
        self
    }

    pub fn confirm_calls(&self) -> Vec<ConfirmPayload> {
        self.confirm_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadApi for MockUploadApi {
    async fn request_upload(&self, payload: &UploadPayload) -> Result<UploadResponse, ApiError> {
        self.upload_requests.lock().unwrap().push(payload.clone());
        (self.upload)()
    }

    async fn confirm_upload(&self, payload: &ConfirmPayload) -> Result<ConfirmResponse, ApiError> {
        self.confirm_requests.lock().unwrap().push(payload.clone());
        (self.confirm)()
    }
}

/// Object store that reports progress in steps, yielding between them so concurrent
/// uploads interleave.
pub struct MockObjectUploader {
    steps: Vec<u8>,
    failing_urls: HashSet<String>,
    pub puts: Mutex<Vec<(String, String)>>,
}

impl MockObjectUploader {
    pub fn new() -> Self {
        Self {
            steps: vec![25, 50, 75, 100],
            failing_urls: HashSet::new(),
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    pub fn put_urls(&self) -> Vec<String> {
        self.puts.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
    }
}

#[async_trait]
impl ObjectUploader for MockObjectUploader {
    async fn put_object(
        &self,
        upload_url: &str,
        file: &SelectedFile,
        on_progress: ProgressCallback,
    ) -> Result<(), ApiError> {
        self.puts
            .lock()
            .unwrap()
            .push((upload_url.to_string(), file.mime_type.clone()));

        let fails = self.failing_urls.contains(upload_url);
        for step in &self.steps {
            if fails && *step > 50 {
                return Err(ApiError::Status {
                    status: 403,
                    message: "AccessDenied".to_string(),
                });
            }
            on_progress(*step);
            tokio::task::yield_now().await;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MockAuthApi {
    users: Mutex<HashMap<String, (String, String)>>,
}

impl MockAuthApi {
    pub fn with_user(self, username: &str, password: &str, user_id: &str) -> Self {
        self.users.lock().unwrap().insert(
            username.to_string(),
            (password.to_string(), user_id.to_string()),
        );
        self
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn register(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&credentials.username) {
            return Err(ApiError::Status {
                status: 409,
                message: "Username already exists".to_string(),
            });
        }
        let user_id = format!("u{}", users.len() + 1);
        users.insert(
            credentials.username.clone(),
            (credentials.password.clone(), user_id.clone()),
        );
        Ok(Session {
            username: credentials.username.clone(),
            user_id,
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        match self.users.lock().unwrap().get(&credentials.username) {
            Some((password, user_id)) if *password == credentials.password => Ok(Session {
                username: credentials.username.clone(),
                user_id: user_id.clone(),
            }),
            _ => Err(ApiError::Status {
                status: 401,
                message: String::new(),
            }),
        }
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
    corrupt: Mutex<bool>,
}

impl MemorySessionStore {
    pub fn corrupt() -> Self {
        Self {
            session: Mutex::new(None),
            corrupt: Mutex::new(true),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        if *self.corrupt.lock().unwrap() {
            let err = serde_json::from_str::<Session>("{not json").unwrap_err();
            return Err(SessionError::Corrupt(err));
        }
        Ok(self.current())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.corrupt.lock().unwrap() = false;
        *self.session.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Default)]
pub struct MockFilesApi {
    pages: Mutex<HashMap<u32, FilesPage>>,
    files: Mutex<HashMap<String, MediaFile>>,
    fail_list: Mutex<bool>,
    pub queries: Mutex<Vec<FilesQuery>>,
    pub downloads: Mutex<Vec<String>>,
}

impl MockFilesApi {
    pub fn with_page(self, page: u32, listing: FilesPage) -> Self {
        self.pages.lock().unwrap().insert(page, listing);
        self
    }

    pub fn with_file(self, file: MediaFile) -> Self {
        self.files.lock().unwrap().insert(file.file_id.clone(), file);
        self
    }

    pub fn fail_listing(&self) {
        *self.fail_list.lock().unwrap() = true;
    }
}

#[async_trait]
impl FilesApi for MockFilesApi {
    async fn list_files(&self, query: &FilesQuery) -> Result<FilesPage, ApiError> {
        self.queries.lock().unwrap().push(query.clone());
        if *self.fail_list.lock().unwrap() {
            return Err(network_error());
        }
        Ok(self
            .pages
            .lock()
            .unwrap()
            .get(&query.page)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_file(&self, file_id: &str) -> Result<Option<MediaFile>, ApiError> {
        Ok(self.files.lock().unwrap().get(file_id).cloned())
    }

    async fn track_download(&self, file_id: &str) -> Result<(), ApiError> {
        self.downloads.lock().unwrap().push(file_id.to_string());
        Err(network_error())
    }
}

#[derive(Default)]
pub struct MockCommentsApi {
    comments: Mutex<Vec<Comment>>,
    fail: Mutex<bool>,
    pub posted: Mutex<Vec<NewComment>>,
}

impl MockCommentsApi {
    pub fn failing() -> Self {
        let api = Self::default();
        *api.fail.lock().unwrap() = true;
        api
    }
}

#[async_trait]
impl CommentsApi for MockCommentsApi {
    async fn list_comments(&self, _file_id: &str) -> Result<Vec<Comment>, ApiError> {
        if *self.fail.lock().unwrap() {
            return Err(server_error("comments unavailable"));
        }
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<(), ApiError> {
        if *self.fail.lock().unwrap() {
            return Err(network_error());
        }
        self.posted.lock().unwrap().push(comment.clone());
        self.comments.lock().unwrap().push(Comment {
            comment_id: format!("c{}", self.posted.lock().unwrap().len()),
            comment_text: comment.comment_text.clone(),
            username: Some(comment.username.clone()),
            ..Default::default()
        });
        Ok(())
    }

    async fn reply(&self, reply: &NewComment) -> Result<(), ApiError> {
        if *self.fail.lock().unwrap() {
            return Err(network_error());
        }
        self.posted.lock().unwrap().push(reply.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLikesApi {
    liked: Mutex<HashSet<(String, String)>>,
    fail_toggle: Mutex<bool>,
    pub toggles: Mutex<usize>,
}

impl MockLikesApi {
    pub fn failing_toggle() -> Self {
        let api = Self::default();
        *api.fail_toggle.lock().unwrap() = true;
        api
    }

    pub fn liked_by(self, file_id: &str, user_id: &str) -> Self {
        self.liked
            .lock()
            .unwrap()
            .insert((file_id.to_string(), user_id.to_string()));
        self
    }
}

#[async_trait]
impl LikesApi for MockLikesApi {
    async fn check_like(&self, file_id: &str, user_id: &str) -> Result<bool, ApiError> {
        Ok(self
            .liked
            .lock()
            .unwrap()
            .contains(&(file_id.to_string(), user_id.to_string())))
    }

    async fn toggle_like(&self, file_id: &str, user_id: &str) -> Result<(), ApiError> {
        *self.toggles.lock().unwrap() += 1;
        if *self.fail_toggle.lock().unwrap() {
            return Err(network_error());
        }
        let key = (file_id.to_string(), user_id.to_string());
        let mut liked = self.liked.lock().unwrap();
        if !liked.remove(&key) {
            liked.insert(key);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MockReportApi {
    pub reports: Mutex<Vec<ReportRequest>>,
}

#[async_trait]
impl ReportApi for MockReportApi {
    async fn send_report(&self, report: &ReportRequest) -> Result<(), ApiError> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockClipboard {
    pub contents: Mutex<Vec<String>>,
    pub broken: bool,
}

#[async_trait]
impl Clipboard for MockClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        if self.broken {
            anyhow::bail!("clipboard unavailable");
        }
        self.contents.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub enum ShareBehavior {
    Unavailable,
    Succeed,
    Cancel,
    Fail,
}

pub struct MockShareSheet {
    pub behavior: ShareBehavior,
    pub shared: Mutex<Vec<(String, String)>>,
}

impl MockShareSheet {
    pub fn new(behavior: ShareBehavior) -> Self {
        Self {
            behavior,
            shared: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ShareSheet for MockShareSheet {
    fn is_available(&self) -> bool {
        !matches!(self.behavior, ShareBehavior::Unavailable)
    }

    async fn share(&self, title: &str, url: &str) -> Result<(), ShareError> {
        self.shared
            .lock()
            .unwrap()
            .push((title.to_string(), url.to_string()));
        match self.behavior {
            ShareBehavior::Cancel => Err(ShareError::Cancelled),
            ShareBehavior::Fail => Err(ShareError::Failed("no targets".to_string())),
            _ => Ok(()),
        }
    }
}
