//! Authenticated-caller extractor
//!
//! Handlers take a [`CurrentUser`] argument to require a valid bearer token;
//! missing or bad credentials reject the request before the handler runs.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let Some(header) = header else {
            security_log!("WARN", "auth_missing", uri = format!("{}", parts.uri));
            return Err(AppError::unauthorized());
        };

        let token = JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

        let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{e}"),
                uri = format!("{}", parts.uri)
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

        CurrentUser::try_from(claims)
            .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")))
    }
}
