use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Payment, PaymentCreate, PaymentSummary, PaymentUpdate};
use crate::error::ApiError;
use crate::services::payments::{PaymentFilter, PaymentService};
use crate::services::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub payment_mode: Option<String>,
    pub payment_source: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl PaymentListQuery {
    fn filter(&self) -> PaymentFilter {
        PaymentFilter {
            payment_mode: self.payment_mode.clone(),
            payment_source: self.payment_source.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// POST /payments
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PaymentCreate>,
) -> Result<Json<Payment>, ApiError> {
    let payment = PaymentService::new(state.pool.clone()).create(payload).await?;
    Ok(Json(payment))
}

/// GET /payments
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let page = Page::new(query.skip, query.limit);
    let payments = PaymentService::new(state.pool.clone())
        .list(query.filter(), page)
        .await?;
    Ok(Json(payments))
}

/// GET /payments/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Payment>, ApiError> {
    let payment = PaymentService::new(state.pool.clone()).get(id).await?;
    Ok(Json(payment))
}

/// PUT /payments/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<PaymentUpdate>,
) -> Result<Json<Payment>, ApiError> {
    let payment = PaymentService::new(state.pool.clone())
        .update(id, changes)
        .await?;
    Ok(Json(payment))
}

/// DELETE /payments/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    PaymentService::new(state.pool.clone()).delete(id).await?;
    Ok(Json(json!({"message": "Payment deleted successfully"})))
}

/// GET /payments/ref/:ref_no
pub async fn get_by_ref(
    State(state): State<AppState>,
    Path(ref_no): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    let payment = PaymentService::new(state.pool.clone())
        .find_by_ref(&ref_no)
        .await?;
    Ok(Json(payment))
}

/// GET /payments/date-range/:start_date/:end_date
pub async fn list_date_range(
    State(state): State<AppState>,
    Path((start_date, end_date)): Path<(NaiveDate, NaiveDate)>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let payments = PaymentService::new(state.pool.clone())
        .list_date_range(start_date, end_date)
        .await?;
    Ok(Json(payments))
}

/// GET /payments/summary/total - Count and exact sums over the same
/// filters as the listing
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<PaymentSummary>, ApiError> {
    let summary = PaymentService::new(state.pool.clone())
        .summary(query.filter())
        .await?;
    Ok(Json(summary))
}
