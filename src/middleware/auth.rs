use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::database::models::{User, UserRole};
use crate::error::ApiError;
use crate::services::users::UserService;
use crate::state::AppState;

/// Authentication middleware. Accepts a bearer token in the Authorization
/// header or an access_token cookie, resolves it to a user row and injects
/// the user into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Not authenticated".to_string()))?;

    let email = auth::verify_token(&token)?;

    let user = UserService::new(state.pool.clone())
        .find_by_email(&email)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::unauthorized("User not found".to_string()))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Guard for owner-only operations.
pub fn require_owner(user: &User) -> Result<(), ApiError> {
    if user.role != UserRole::Owner {
        return Err(ApiError::forbidden(
            "Only owners can access this resource".to_string(),
        ));
    }
    Ok(())
}

/// Bearer header first, access_token cookie as the fallback.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                if !token.trim().is_empty() {
                    return Some(token.trim().to_string());
                }
            }
        }
    }

    let cookies = headers.get("cookie")?.to_str().ok()?;
    for part in cookies.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("access_token=") {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
