//! API handlers for Guichet REST endpoints

pub mod auth;
pub mod health;
pub mod institutions;
pub mod openapi;
pub mod operator;
pub mod queues;
pub mod stats;
pub mod tickets;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, models::user::UserClaims, AppState};

fn claims_from_parts(parts: &Parts, state: &AppState) -> Result<UserClaims, AppError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::Authentication("Invalid authorization header format".to_string()));
    }

    let token = &auth_header[7..];

    UserClaims::from_token(token, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Authentication(e.to_string()))
}

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(AuthenticatedUser(claims_from_parts(parts, state)?))
    }
}

/// Extractor for endpoints that serve both anonymous and signed-in callers
/// (ticket creation and cancellation). A missing header yields `None`; a
/// present but invalid token is still rejected.
pub struct MaybeAuthenticatedUser(pub Option<UserClaims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if parts.headers.get(AUTHORIZATION).is_none() {
            return Ok(MaybeAuthenticatedUser(None));
        }

        Ok(MaybeAuthenticatedUser(Some(claims_from_parts(parts, state)?)))
    }
}
