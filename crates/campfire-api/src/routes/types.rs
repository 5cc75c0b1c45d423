//! Request/Response DTOs

use campfire_db::{Relay, StorySummary};
use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Signup request
#[derive(Deserialize)]
pub struct SignupRequest {
    pub nickname: String,
    pub password: String,
}

/// Signin request
#[derive(Deserialize)]
pub struct SigninRequest {
    pub nickname: String,
    pub password: String,
}

/// Signin response
#[derive(Serialize)]
pub struct SigninResponse {
    pub token: String,
}

/// Generic success message
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// ==================== Story Types ====================

/// Create story request
#[derive(Deserialize)]
pub struct CreateStoryRequest {
    pub title: String,
    pub content: String,
}

/// Update story request; omitted fields are left unchanged
#[derive(Deserialize)]
pub struct UpdateStoryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_finished: Option<bool>,
}

/// Story list response
#[derive(Serialize)]
pub struct StoriesResponse {
    pub stories: Vec<StorySummary>,
}

/// Story detail with its relays
#[derive(Serialize)]
pub struct StoryDetail {
    #[serde(flatten)]
    pub story: StorySummary,
    pub relays: Vec<Relay>,
}

/// Story detail response
#[derive(Serialize)]
pub struct StoryDetailResponse {
    pub story: StoryDetail,
}

// ==================== Relay Types ====================

/// Append relay request
#[derive(Deserialize)]
pub struct CreateRelayRequest {
    pub content: String,
}

/// Update relay request
#[derive(Deserialize)]
pub struct UpdateRelayRequest {
    pub content: String,
}

// ==================== Like Types ====================

/// Like toggle response
#[derive(Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: i64,
}
