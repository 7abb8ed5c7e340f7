use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Defaulted so an absent field lands in the emptiness check below and
    /// comes back as a 400, not a 422 deserialization rejection.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Handler for account registration
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    if state.users.find_by_username(username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = state.credentials.hash_password(&request.password)?;
    let user = state.users.create(username, &password_hash).await?;
    let token = state.credentials.issue_token(user.id, &user.username)?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Handler for account login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<Json<TokenResponse>> {
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    // One message for both unknown-user and wrong-password, so the endpoint
    // does not leak which usernames exist.
    let user = state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?;

    if !state
        .credentials
        .verify_password(&request.password, &user.password_hash)?
    {
        return Err(AppError::Auth("Invalid credentials".to_string()));
    }

    let token = state.credentials.issue_token(user.id, &user.username)?;

    Ok(Json(TokenResponse { token }))
}
