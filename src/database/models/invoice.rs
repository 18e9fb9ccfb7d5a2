use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One line of an invoice: a label/value pair with its own status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub label: String,
    pub value: String,
    #[serde(default = "default_detail_status")]
    pub status: String,
}

fn default_detail_status() -> String {
    "active".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub doc_id: Option<Uuid>,
    pub category: Option<String>,
    pub accounting_type: Option<String>,
    pub invoice_details: Option<Json<Vec<InvoiceDetail>>>,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceCreate {
    pub doc_id: Option<Uuid>,
    pub category: Option<String>,
    pub accounting_type: Option<String>,
    pub invoice_details: Option<Vec<InvoiceDetail>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceUpdate {
    pub doc_id: Option<Uuid>,
    pub category: Option<String>,
    pub accounting_type: Option<String>,
    pub invoice_details: Option<Vec<InvoiceDetail>>,
}
