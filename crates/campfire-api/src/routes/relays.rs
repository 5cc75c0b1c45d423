//! Relay routes
//!
//! Relays are continuations appended to a parent story; their routes are
//! nested under /stories/{story_id}.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
};
use campfire_db::{NewRelay, Relay};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::{CreateRelayRequest, LikeResponse, MessageResponse, UpdateRelayRequest};

/// Fetch a relay and check it belongs to the story in the path
async fn relay_in_story(
    state: &AppState,
    story_id: i64,
    relay_id: i64,
) -> Result<Relay, ApiError> {
    let relay = state
        .db
        .get_relay_by_id(relay_id)
        .await?
        .filter(|r| r.story_id == story_id)
        .ok_or_else(|| ApiError::NotFound("Relay does not exist".to_string()))?;
    Ok(relay)
}

/// POST /stories/{story_id}/relays
async fn create_relay(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(story_id): Path<i64>,
    Json(request): Json<CreateRelayRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let story = state
        .db
        .get_story_by_id(story_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Story does not exist".to_string()))?;

    if story.is_finished {
        return Err(ApiError::PreconditionFailed(
            "Story is already finished".to_string(),
        ));
    }

    debug!("User {} appending relay to story {}", user.nickname, story_id);

    state
        .db
        .insert_relay(NewRelay {
            story_id,
            user_id: user.id,
            content: request.content,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Relay appended")),
    ))
}

/// PUT /stories/{story_id}/relays/{relay_id}
async fn update_relay(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((story_id, relay_id)): Path<(i64, i64)>,
    Json(request): Json<UpdateRelayRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let relay = relay_in_story(&state, story_id, relay_id).await?;

    if !user.can_mutate(relay.user_id) {
        return Err(ApiError::Forbidden(
            "You do not have permission to edit this relay".to_string(),
        ));
    }

    state.db.update_relay(relay_id, &request.content).await?;

    info!("User {} updated relay {}", user.nickname, relay_id);

    Ok(Json(MessageResponse::new("Relay updated")))
}

/// DELETE /stories/{story_id}/relays/{relay_id}
async fn delete_relay(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((story_id, relay_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let relay = relay_in_story(&state, story_id, relay_id).await?;

    if !user.can_mutate(relay.user_id) {
        return Err(ApiError::Forbidden(
            "You do not have permission to delete this relay".to_string(),
        ));
    }

    state.db.delete_relay(relay_id).await?;

    info!("User {} deleted relay {}", user.nickname, relay_id);

    Ok(Json(MessageResponse::new("Relay deleted")))
}

/// PUT /stories/{story_id}/relays/{relay_id}/like
async fn like_relay(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((story_id, relay_id)): Path<(i64, i64)>,
) -> Result<Json<LikeResponse>, ApiError> {
    relay_in_story(&state, story_id, relay_id).await?;

    let liked = state.db.toggle_relay_like(user.id, relay_id).await?;
    let like_count = state
        .db
        .get_relay_by_id(relay_id)
        .await?
        .map(|r| r.like_count)
        .unwrap_or_default();

    Ok(Json(LikeResponse { liked, like_count }))
}

/// Create relay routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stories/{story_id}/relays", post(create_relay))
        .route(
            "/stories/{story_id}/relays/{relay_id}",
            put(update_relay).delete(delete_relay),
        )
        .route("/stories/{story_id}/relays/{relay_id}/like", put(like_relay))
}
