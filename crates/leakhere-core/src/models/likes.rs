use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCheckResponse {
    #[serde(default)]
    pub liked: bool,
}

/// Body of `POST /likes/toggle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeToggleRequest {
    pub file_id: String,
    pub user_id: String,
}

/// Like flag and counter as displayed for one media item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: u64,
}

impl LikeState {
    pub fn new(liked: bool, like_count: u64) -> Self {
        Self { liked, like_count }
    }

    /// State after one toggle. The counter never goes below zero.
    pub fn toggled(self) -> Self {
        if self.liked {
            Self {
                liked: false,
                like_count: self.like_count.saturating_sub(1),
            }
        } else {
            Self {
                liked: true,
                like_count: self.like_count + 1,
            }
        }
    }
}
