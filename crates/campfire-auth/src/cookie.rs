//! Token transport via the authorization cookie
//!
//! Clients carry the token in a cookie named `authorization` whose value is
//! `Bearer <token>`.

use crate::error::AuthError;

/// Name of the cookie carrying the identity token
pub const AUTH_COOKIE: &str = "authorization";

/// Extract the bearer token from a `Cookie` request header value
pub fn bearer_token_from_cookies(header: &str) -> Result<&str, AuthError> {
    let value = header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value)
        .ok_or(AuthError::MissingAuthCookie)?;

    value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidAuthCookie)
}
