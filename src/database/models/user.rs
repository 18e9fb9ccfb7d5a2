use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account role. Values are case-sensitive constants; no string comparison
/// happens anywhere outside this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Owner,
    Accountant,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_no: Option<String>,
    pub location: Option<String>,
    /// Argon2 hash, never the plain password. Excluded from responses.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: UserRole,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub phone_no: Option<String>,
    pub location: Option<String>,
    pub password: String,
    pub role: UserRole,
}

/// Partial update: only supplied fields are overwritten. Role and password
/// are deliberately not updatable through this shape.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_no: Option<String>,
    pub location: Option<String>,
}
