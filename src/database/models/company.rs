use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub location: Option<Json<Value>>,
    pub base_currency: String,
    pub gst_number: Option<String>,
    pub accounting_month: Option<i64>,
    pub contact_person: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CompanyCreate {
    pub name: String,
    pub email: Option<String>,
    pub location: Option<Value>,
    #[serde(default = "default_currency")]
    pub base_currency: String,
    pub gst_number: Option<String>,
    pub accounting_month: Option<i64>,
    pub contact_person: Option<Value>,
}

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<Value>,
    pub base_currency: Option<String>,
    pub gst_number: Option<String>,
    pub accounting_month: Option<i64>,
    pub contact_person: Option<Value>,
}

/// Replace-all accountant assignment request.
#[derive(Debug, Deserialize)]
pub struct AssignAccountantRequest {
    pub user_id: Uuid,
    pub company_ids: Vec<Uuid>,
}
