use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::{
    auth::{repo_types::User, services::JwtKeys},
    error::{AppError, INVALID_CREDENTIALS},
    state::AppState,
};

/// Bearer-authenticated user, resolved from the token subject.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Expect "Bearer <token>"
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|auth| {
                auth.strip_prefix("Bearer ")
                    .or_else(|| auth.strip_prefix("bearer "))
            })
            .ok_or(AppError::Unauthorized(INVALID_CREDENTIALS))?;

        let keys = JwtKeys::from_config(&state.config.jwt);
        let claims = keys.verify(token.trim()).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized(INVALID_CREDENTIALS)
        })?;

        match User::find_by_username(&state.db, &claims.sub).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(subject = %claims.sub, "token subject has no user");
                Err(AppError::Unauthorized(INVALID_CREDENTIALS))
            }
        }
    }
}
