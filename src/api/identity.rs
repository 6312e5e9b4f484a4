//! Caller identity.
//!
//! Authentication happens upstream; by the time a request arrives here the
//! proxy has put an opaque user id into a configured header. Requests without
//! it are rejected with 401 before any handler runs.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap, HeaderName, StatusCode},
};

use super::handlers::api_error;
use crate::error::WorkoutError;

/// Name of the header carrying the user id.
#[derive(Debug, Clone)]
pub struct UserHeader(pub HeaderName);

/// The authenticated user making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Reads a non-blank user id from `headers`.
fn user_id_from(headers: &HeaderMap, header: &HeaderName) -> Option<String> {
    let value = headers.get(header)?.to_str().ok()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    UserHeader: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let UserHeader(header) = UserHeader::from_ref(state);
        match user_id_from(&parts.headers, &header) {
            Some(user_id) => Ok(CurrentUser(user_id)),
            None => Err(api_error(WorkoutError::Unauthenticated)),
        }
    }
}
