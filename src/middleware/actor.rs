// ABOUTME: Acting-user extraction from the x-actor-id request header
// ABOUTME: Write endpoints take CurrentActor; a missing or malformed header is a 401

use axum::async_trait;
use axum::extract::FromRequestParts;
use http::request::Parts;
use http::HeaderMap;
use uuid::Uuid;

use super::tracing::record_actor;
use crate::constants::headers;
use crate::errors::{AppError, AppResult};

/// The user on whose behalf a write is performed
///
/// Identity is taken at face value; verifying it belongs to an outer gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentActor(pub Uuid);

/// Read the actor id from request headers
///
/// # Errors
///
/// Returns `AuthRequired` when the header is absent and `AuthInvalid` when it
/// is not a UUID
pub fn actor_from_headers(header_map: &HeaderMap) -> AppResult<Uuid> {
    let raw = header_map
        .get(headers::ACTOR_ID)
        .ok_or_else(AppError::auth_required)?
        .to_str()
        .map_err(|_| AppError::auth_invalid("The x-actor-id header is not valid text"))?
        .trim();
    if raw.is_empty() {
        return Err(AppError::auth_required());
    }
    Uuid::parse_str(raw).map_err(|_| AppError::auth_invalid("The x-actor-id header must be a UUID"))
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = actor_from_headers(&parts.headers)?;
        record_actor(&actor);
        Ok(Self(actor))
    }
}
