use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub file_name: String,
    /// Path of the stored file under the upload directory.
    pub file_url: String,
    pub status: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub party_name: Option<String>,
    pub upload_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentCreate {
    pub file_name: String,
    pub file_url: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub party_name: Option<String>,
}

fn default_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentUpdate {
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub party_name: Option<String>,
}
