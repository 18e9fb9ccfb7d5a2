use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Invoice, InvoiceCreate, InvoiceUpdate};
use crate::error::ApiError;
use crate::services::invoices::{InvoiceFilter, InvoiceService};
use crate::services::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InvoiceListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub accounting_type: Option<String>,
}

/// POST /invoices
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<InvoiceCreate>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = InvoiceService::new(state.pool.clone()).create(payload).await?;
    Ok(Json(invoice))
}

/// GET /invoices
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<InvoiceListQuery>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let invoices = InvoiceService::new(state.pool.clone())
        .list(
            InvoiceFilter {
                category: query.category,
                accounting_type: query.accounting_type,
            },
            Page::new(query.skip, query.limit),
        )
        .await?;
    Ok(Json(invoices))
}

/// GET /invoices/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = InvoiceService::new(state.pool.clone()).get(id).await?;
    Ok(Json(invoice))
}

/// PUT /invoices/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<InvoiceUpdate>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = InvoiceService::new(state.pool.clone())
        .update(id, changes)
        .await?;
    Ok(Json(invoice))
}

/// DELETE /invoices/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    InvoiceService::new(state.pool.clone()).delete(id).await?;
    Ok(Json(json!({"message": "Invoice deleted successfully"})))
}

/// GET /invoices/document/:document_id
pub async fn list_for_document(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let invoices = InvoiceService::new(state.pool.clone())
        .list_for_document(document_id)
        .await?;
    Ok(Json(invoices))
}

/// GET /invoices/category/:category
pub async fn list_for_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let invoices = InvoiceService::new(state.pool.clone())
        .list_for_category(&category)
        .await?;
    Ok(Json(invoices))
}
