use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{
    AssignAccountantRequest, Company, CompanyCreate, CompanyUpdate, User, UserRole,
};
use crate::error::ApiError;
use crate::middleware::require_owner;
use crate::services::companies::CompanyService;
use crate::services::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompanyListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// POST /companies (owner only)
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CompanyCreate>,
) -> Result<Json<Company>, ApiError> {
    require_owner(&user)?;

    let company = CompanyService::new(state.pool.clone()).create(payload).await?;
    Ok(Json(company))
}

/// GET /companies - Owners see every company, accountants only the
/// ones they are assigned to.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<CompanyListQuery>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let svc = CompanyService::new(state.pool.clone());
    let page = Page::new(query.skip, query.limit);

    let companies = match user.role {
        UserRole::Owner => svc.list(page).await?,
        UserRole::Accountant => svc.list_for_user(user.id, page).await?,
    };
    Ok(Json(companies))
}

/// GET /companies/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, ApiError> {
    let company = CompanyService::new(state.pool.clone()).get(id).await?;
    Ok(Json(company))
}

/// PUT /companies/:id (owner only)
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(changes): Json<CompanyUpdate>,
) -> Result<Json<Company>, ApiError> {
    require_owner(&user)?;

    let company = CompanyService::new(state.pool.clone())
        .update(id, changes)
        .await?;
    Ok(Json(company))
}

/// DELETE /companies/:id (owner only)
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_owner(&user)?;

    CompanyService::new(state.pool.clone()).delete(id).await?;
    Ok(Json(json!({"message": "Company deleted successfully"})))
}

/// POST /companies/assign-accountant (owner only). Replaces the
/// accountant's full assignment set.
pub async fn assign_accountant(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<AssignAccountantRequest>,
) -> Result<Json<Value>, ApiError> {
    require_owner(&user)?;

    CompanyService::new(state.pool.clone())
        .assign_accountant(payload.user_id, &payload.company_ids)
        .await?;
    Ok(Json(json!({
        "message": "Accountant assigned successfully",
        "user_id": payload.user_id,
        "company_ids": payload.company_ids,
    })))
}
