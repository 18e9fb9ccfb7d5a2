use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth;
use crate::database::models::{User, UserRole, UserUpdate};
use crate::error::ApiError;
use crate::middleware::require_owner;
use crate::services::users::UserService;
use crate::services::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub password: String,
}

/// GET /users/me - Profile of the authenticated user
pub async fn me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

/// PUT /users/me - Partial self-update
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(changes): Json<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    let updated = UserService::new(state.pool.clone())
        .update(user.id, changes)
        .await?;
    Ok(Json(updated))
}

/// GET /users - List users, optionally filtered by role (owner only)
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    require_owner(&user)?;

    let users = UserService::new(state.pool.clone())
        .list(query.role, Page::new(query.skip, query.limit))
        .await?;
    Ok(Json(users))
}

/// GET /users/accountants - List accountant users (owner only)
pub async fn list_accountants(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    require_owner(&user)?;

    let users = UserService::new(state.pool.clone())
        .list(
            Some(UserRole::Accountant),
            Page::new(query.skip, query.limit),
        )
        .await?;
    Ok(Json(users))
}

/// GET /users/:id (owner only)
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    require_owner(&user)?;

    let found = UserService::new(state.pool.clone()).get(id).await?;
    Ok(Json(found))
}

/// PUT /users/:id (owner only)
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(changes): Json<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    require_owner(&user)?;

    let updated = UserService::new(state.pool.clone())
        .update(id, changes)
        .await?;
    Ok(Json(updated))
}

/// DELETE /users/:id (owner only). Owners cannot delete themselves.
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_owner(&user)?;

    if id == user.id {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }

    UserService::new(state.pool.clone()).delete(id).await?;
    Ok(Json(json!({"message": "User deleted successfully"})))
}

/// PATCH /users/:id/password - Reset a user's password (owner only)
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<Value>, ApiError> {
    require_owner(&user)?;

    let password_hash = auth::hash_password(&payload.password)?;
    UserService::new(state.pool.clone())
        .reset_password(id, password_hash)
        .await?;
    Ok(Json(json!({"message": "Password updated successfully"})))
}
