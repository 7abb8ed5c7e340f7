use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

/// Authenticated caller, stored in request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Middleware guarding a route tree behind bearer-token authentication.
///
/// The missing-header, missing-token, and bad-token cases each carry their
/// own message so clients can tell a logged-out state from a malformed
/// request. All three map to 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Auth("Authorization header missing".to_string()))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Auth("Bearer token missing".to_string()))?;

    let claims = state.credentials.verify_token(token)?;
    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(request).await)
}
