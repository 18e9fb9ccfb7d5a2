use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub ledger_name: Option<String>,
    pub currency_type: String,
    pub gst_status: Option<String>,
    pub gst: Option<String>,
    pub address: Option<Json<Value>>,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SupplierCreate {
    pub name: String,
    pub ledger_name: Option<String>,
    #[serde(default = "default_currency")]
    pub currency_type: String,
    pub gst_status: Option<String>,
    pub gst: Option<String>,
    pub address: Option<Value>,
}

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub ledger_name: Option<String>,
    pub currency_type: Option<String>,
    pub gst_status: Option<String>,
    pub gst: Option<String>,
    pub address: Option<Value>,
}

/// Replace-all supplier assignment request.
#[derive(Debug, Deserialize)]
pub struct AssignSupplierRequest {
    pub supplier_id: Uuid,
    pub company_ids: Vec<Uuid>,
}
