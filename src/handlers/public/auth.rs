use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::database::models::{User, UserCreate};
use crate::error::ApiError;
use crate::services::users::UserService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /auth/register - Create a user account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let password_hash = auth::hash_password(&payload.password)?;

    let user = UserService::new(state.pool.clone())
        .create(payload, password_hash)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login - Exchange credentials for an access token.
/// The token is returned in the body and also set as a cookie so
/// browser sessions work without an Authorization header.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = UserService::new(state.pool.clone())
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Incorrect email or password"))?;

    if !auth::verify_password(&payload.password, &user.password)? {
        return Err(ApiError::unauthorized("Incorrect email or password"));
    }

    let token = auth::issue_token(&user.email)?;

    let cookie = format!(
        "access_token={}; Path=/; HttpOnly; SameSite=Lax",
        token
    );
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        }),
    ))
}

/// POST /auth/logout - Clear the session cookie. Tokens are not
/// revoked server-side; an already issued bearer token stays valid
/// until it expires.
pub async fn logout() -> impl IntoResponse {
    let cookie = "access_token=; Path=/; HttpOnly; Max-Age=0".to_string();
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(serde_json::json!({"message": "Successfully logged out"})),
    )
}
