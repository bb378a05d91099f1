//! Authentication Handlers
//!
//! Handles login and token issuance. User provisioning is out of band;
//! there is no registration endpoint.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::core::ServerState;
use crate::db::repository::user as user_repo;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub is_staff: bool,
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token. Unknown user and
/// wrong password produce the same error to prevent username enumeration.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = user_repo::find_by_username(state.get_db(), &req.username).await?;

    let user = match user {
        Some(u) => u,
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = auth::verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        tracing::warn!(username = %req.username, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .get_jwt_service()
        .generate_token(user.id, &user.username, &user.first_name, user.is_staff)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(Json(LoginResponse {
        token,
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        is_staff: user.is_staff,
    }))
}
