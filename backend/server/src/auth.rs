//! Caller identity.
//!
//! Authentication happens upstream: the reverse proxy verifies the session and
//! forwards the user id in [`USER_HEADER`]. Ids end up inside storage keys, so
//! only a conservative character set is accepted.
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

pub const USER_HEADER: &str = "x-user-id";
pub const MAX_USER_ID_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser(pub String);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| is_valid_user_id(user))
            .map(|user| AuthUser(user.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}

fn is_valid_user_id(user: &str) -> bool {
    !user.is_empty()
        && user.len() <= MAX_USER_ID_LEN
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
}
