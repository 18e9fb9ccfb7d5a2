use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::fixture::DashboardFixture;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub limit: Option<usize>,
}

/// GET /dashboard/data - The full reporting fixture
pub async fn data(State(state): State<AppState>) -> Json<DashboardFixture> {
    Json(state.fixture.as_ref().clone())
}

/// GET /dashboard/transactions?limit=N - Recent transactions slice
pub async fn transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Json<Value> {
    let all = &state.fixture.recent_transactions;
    let limit = query.limit.unwrap_or(10).min(all.len());

    Json(json!({
        "transactions": &all[..limit],
        "total": all.len(),
    }))
}
