use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{AssignSupplierRequest, Supplier, SupplierCreate, SupplierUpdate, User};
use crate::error::ApiError;
use crate::middleware::require_owner;
use crate::services::suppliers::{SupplierFilter, SupplierService};
use crate::services::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SupplierListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub currency_type: Option<String>,
    pub gst_status: Option<String>,
}

/// POST /suppliers
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<SupplierCreate>,
) -> Result<Json<Supplier>, ApiError> {
    let supplier = SupplierService::new(state.pool.clone()).create(payload).await?;
    Ok(Json(supplier))
}

/// GET /suppliers
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SupplierListQuery>,
) -> Result<Json<Vec<Supplier>>, ApiError> {
    let suppliers = SupplierService::new(state.pool.clone())
        .list(
            SupplierFilter {
                currency_type: query.currency_type,
                gst_status: query.gst_status,
            },
            Page::new(query.skip, query.limit),
        )
        .await?;
    Ok(Json(suppliers))
}

/// GET /suppliers/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Supplier>, ApiError> {
    let supplier = SupplierService::new(state.pool.clone()).get(id).await?;
    Ok(Json(supplier))
}

/// PUT /suppliers/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<SupplierUpdate>,
) -> Result<Json<Supplier>, ApiError> {
    let supplier = SupplierService::new(state.pool.clone())
        .update(id, changes)
        .await?;
    Ok(Json(supplier))
}

/// DELETE /suppliers/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    SupplierService::new(state.pool.clone()).delete(id).await?;
    Ok(Json(json!({"message": "Supplier deleted successfully"})))
}

/// POST /suppliers/assign-to-companies (owner only). Replaces the
/// supplier's full company set.
pub async fn assign_to_companies(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<AssignSupplierRequest>,
) -> Result<Json<Value>, ApiError> {
    require_owner(&user)?;

    SupplierService::new(state.pool.clone())
        .assign_to_companies(payload.supplier_id, &payload.company_ids)
        .await?;
    Ok(Json(json!({
        "message": "Supplier assigned to companies successfully",
        "supplier_id": payload.supplier_id,
        "company_ids": payload.company_ids,
    })))
}

/// GET /suppliers/company/:company_id
pub async fn list_for_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<Vec<Supplier>>, ApiError> {
    let suppliers = SupplierService::new(state.pool.clone())
        .list_for_company(company_id)
        .await?;
    Ok(Json(suppliers))
}

/// DELETE /suppliers/company/:company_id/supplier/:supplier_id (owner only)
pub async fn remove_from_company(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((company_id, supplier_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, ApiError> {
    require_owner(&user)?;

    SupplierService::new(state.pool.clone())
        .remove_from_company(company_id, supplier_id)
        .await?;
    Ok(Json(json!({
        "message": "Supplier removed from company successfully"
    })))
}
