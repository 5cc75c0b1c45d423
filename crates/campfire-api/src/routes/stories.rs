//! Story routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use campfire_db::{NewStory, StoryUpdate};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::{
    CreateStoryRequest, LikeResponse, MessageResponse, StoriesResponse, StoryDetail,
    StoryDetailResponse, UpdateStoryRequest,
};

/// GET /stories
async fn list_stories(State(state): State<AppState>) -> Result<Json<StoriesResponse>, ApiError> {
    let stories = state.db.list_stories().await?;
    Ok(Json(StoriesResponse { stories }))
}

/// POST /stories
async fn create_story(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateStoryRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    debug!("User {} creating story: {}", user.nickname, request.title);

    state
        .db
        .insert_story(NewStory {
            user_id: user.id,
            title: request.title,
            content: request.content,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Story created")),
    ))
}

/// GET /stories/{story_id}
async fn get_story(
    State(state): State<AppState>,
    Path(story_id): Path<i64>,
) -> Result<Json<StoryDetailResponse>, ApiError> {
    let story = state
        .db
        .get_story_summary(story_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Story does not exist".to_string()))?;

    let relays = state.db.list_relays(story_id).await?;

    Ok(Json(StoryDetailResponse {
        story: StoryDetail { story, relays },
    }))
}

/// PUT /stories/{story_id}
async fn update_story(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(story_id): Path<i64>,
    Json(request): Json<UpdateStoryRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Existence before authorization: a missing story has no owner to check.
    let story = state
        .db
        .get_story_by_id(story_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Story does not exist".to_string()))?;

    if !user.can_mutate(story.user_id) {
        return Err(ApiError::Forbidden(
            "You do not have permission to edit this story".to_string(),
        ));
    }

    state
        .db
        .update_story(
            story_id,
            StoryUpdate {
                title: request.title,
                content: request.content,
                is_finished: request.is_finished,
            },
        )
        .await?;

    info!("User {} updated story {}", user.nickname, story_id);

    Ok(Json(MessageResponse::new("Story updated")))
}

/// DELETE /stories/{story_id}
async fn delete_story(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(story_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let story = state
        .db
        .get_story_by_id(story_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Story does not exist".to_string()))?;

    if !user.can_mutate(story.user_id) {
        return Err(ApiError::Forbidden(
            "You do not have permission to delete this story".to_string(),
        ));
    }

    state.db.delete_story(story_id).await?;

    info!("User {} deleted story {}", user.nickname, story_id);

    Ok(Json(MessageResponse::new("Story deleted")))
}

/// PUT /stories/{story_id}/like
async fn like_story(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(story_id): Path<i64>,
) -> Result<Json<LikeResponse>, ApiError> {
    state
        .db
        .get_story_by_id(story_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Story does not exist".to_string()))?;

    let liked = state.db.toggle_story_like(user.id, story_id).await?;
    let like_count = state
        .db
        .get_story_by_id(story_id)
        .await?
        .map(|s| s.like_count)
        .unwrap_or_default();

    Ok(Json(LikeResponse { liked, like_count }))
}

/// Create story routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stories", get(list_stories).post(create_story))
        .route(
            "/stories/{story_id}",
            get(get_story).put(update_story).delete(delete_story),
        )
        .route("/stories/{story_id}/like", put(like_story))
}
