//! Authentication extractor and signup/signin routes

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderValue, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
    routing::post,
};
use campfire_auth::{AuthUser, bearer_token_from_cookies, hash_password, verify_password};
use campfire_db::{NewUser, Role};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{MessageResponse, SigninRequest, SigninResponse, SignupRequest};

// ==================== Auth Gate ====================

/// Extractor for the authenticated user (required)
///
/// Reads the `authorization` cookie, verifies the token, and resolves the
/// embedded user id against the user store. Requests failing any step are
/// rejected before the handler runs.
pub struct RequireAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let cookie_header = parts
            .headers
            .get(header::COOKIE)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = bearer_token_from_cookies(cookie_header)?;
        let claims = app_state.tokens.verify(token)?;

        let user = app_state
            .db
            .get_user_by_id(claims.user_id()?)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        let user = AuthUser::from(&user);
        debug!("Authenticated user: {} ({})", user.nickname, user.role.as_str());

        Ok(RequireAuth(user))
    }
}

// ==================== Input Validation ====================

/// Minimum nickname length
const MIN_NICKNAME_LENGTH: usize = 3;
/// Minimum password length
const MIN_PASSWORD_LENGTH: usize = 4;

/// Validate nickname format: ASCII alphanumeric, 3 characters or more
fn validate_nickname(nickname: &str) -> Result<(), ApiError> {
    if nickname.len() < MIN_NICKNAME_LENGTH
        || !nickname.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ApiError::PreconditionFailed(
            "Nickname format is invalid".to_string(),
        ));
    }
    Ok(())
}

/// Validate password: 4 characters or more, and not containing the nickname
fn validate_password(nickname: &str, password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::PreconditionFailed(
            "Password format is invalid".to_string(),
        ));
    }
    if password.contains(nickname) {
        return Err(ApiError::PreconditionFailed(
            "Password must not contain the nickname".to_string(),
        ));
    }
    Ok(())
}

// ==================== Auth Routes ====================

/// POST /signup
async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    validate_nickname(&request.nickname)?;
    validate_password(&request.nickname, &request.password)?;

    if state
        .db
        .get_user_by_nickname(&request.nickname)
        .await?
        .is_some()
    {
        return Err(ApiError::PreconditionFailed(
            "Nickname is already taken".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)?;

    // A concurrent signup with the same nickname loses here on the UNIQUE
    // constraint and reports the same duplicate failure.
    let user = state
        .db
        .insert_user(NewUser {
            nickname: request.nickname,
            password_hash,
            role: Role::Standard,
        })
        .await?;

    info!("User {} signed up", user.nickname);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Signup completed")),
    ))
}

/// POST /signin
async fn signin(
    State(state): State<AppState>,
    Json(request): Json<SigninRequest>,
) -> Result<Response, ApiError> {
    debug!("Signin attempt for nickname: {}", request.nickname);

    let user_result = state.db.get_user_by_nickname(&request.nickname).await?;

    // Always run verification so a missing user takes as long as a wrong
    // password. The dummy is a valid Argon2 hash that never matches.
    const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nX2F0dGFja19wcmV2ZW50aW9u$K8rI5T7VdQ8xkO0GqK5K2w";

    let (hash_to_verify, user) = match user_result {
        Some(u) => (u.password_hash.clone(), Some(u)),
        None => (DUMMY_HASH.to_string(), None),
    };

    let password_valid = verify_password(&request.password, &hash_to_verify)?;

    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => return Err(ApiError::Unauthorized),
    };

    let token = state.tokens.issue(user.id)?;

    info!("User {} signed in", user.nickname);

    let cookie = format!(
        "{}=Bearer {}; Path=/; HttpOnly",
        campfire_auth::AUTH_COOKIE,
        token
    );
    let cookie_value = HeaderValue::from_str(&cookie)
        .map_err(|_| ApiError::BadRequest("Signin failed".to_string()))?;

    let mut response = Json(SigninResponse { token }).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie_value);
    Ok(response)
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}
