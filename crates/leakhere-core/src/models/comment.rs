use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment with its (one level of) replies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub comment_text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub parent_comment_id: Option<String>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn author(&self) -> &str {
        self.username.as_deref().unwrap_or("User")
    }

    /// Total of this comment and all nested replies.
    pub fn thread_len(&self) -> usize {
        1 + self.replies.iter().map(Comment::thread_len).sum::<usize>()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Body of `POST /comments/add` and `POST /comments/reply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub file_id: String,
    pub user_id: String,
    pub username: String,
    pub comment_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<String>,
}
