//! Caller identity extraction.
//!
//! Authentication itself lives in front of this service; by the time a
//! request arrives here, the auth layer has resolved the caller and
//! stamped their id into the `X-User-Id` header. This extractor trusts
//! that header — the orchestrator only ever performs the ownership
//! equality check against it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mediaforge_core::types::UserId;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller's id, extracted from `X-User-Id`.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub UserId);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Missing X-User-Id header".to_string()))?;

        let raw = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Malformed X-User-Id header".to_string()))?;

        let id = raw.parse::<UserId>().map_err(|_| {
            AppError::Unauthorized(format!("X-User-Id is not a valid UUID: {raw}"))
        })?;

        Ok(Caller(id))
    }
}
