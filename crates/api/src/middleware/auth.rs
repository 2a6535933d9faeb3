use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use brieflink_core::access_token::{select_presented_token, TOKEN_HEADER};
use brieflink_core::actor::ActorContext;
use brieflink_core::types::DbId;
use serde::Deserialize;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated owner extracted from `Authorization: Bearer <jwt>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: Option<String>,
}

impl AuthUser {
    pub fn actor(&self) -> ActorContext {
        ActorContext::Owner {
            user_id: self.user_id,
            email: self.email.clone(),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Respondent magic token from the `x-magic-token` header or `?token=`.
///
/// Never rejects: a missing token is carried through as `None` and turned
/// into `ACCESS_DENIED` by the workflow, exactly like a wrong one.
#[derive(Debug, Clone)]
pub struct MagicToken(pub Option<String>);

impl MagicToken {
    pub fn actor(&self) -> ActorContext {
        ActorContext::respondent(self.0.as_deref())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MagicToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        let query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.token);

        Ok(MagicToken(
            select_presented_token(header, query.as_deref()).map(str::to_string),
        ))
    }
}

/// Owner or respondent, for routes both sides may call.
///
/// An `Authorization` header commits the caller to the owner path, so a bad
/// JWT is rejected rather than silently retried as a magic token.
#[derive(Debug, Clone)]
pub struct Participant(pub ActorContext);

impl FromRequestParts<AppState> for Participant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.contains_key(AUTHORIZATION) {
            let user = AuthUser::from_request_parts(parts, state).await?;
            return Ok(Participant(user.actor()));
        }
        let token = match MagicToken::from_request_parts(parts, state).await {
            Ok(token) => token,
            Err(never) => match never {},
        };
        Ok(Participant(token.actor()))
    }
}
