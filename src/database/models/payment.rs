use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Posting payment details. Money columns are stored as exact decimal text,
/// so `FromRow` is implemented by hand instead of derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub posting_date: Option<NaiveDate>,
    pub booking_remarks: Option<String>,
    pub date_of_payment: Option<NaiveDate>,
    pub payment_mode: Option<String>,
    pub payment_source: Option<String>,
    pub amount_paid: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub ref_no: Option<String>,
    pub narration: Option<String>,
    pub doc_of_proof_url: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, SqliteRow> for Payment {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            posting_date: row.try_get("posting_date")?,
            booking_remarks: row.try_get("booking_remarks")?,
            date_of_payment: row.try_get("date_of_payment")?,
            payment_mode: row.try_get("payment_mode")?,
            payment_source: row.try_get("payment_source")?,
            amount_paid: decode_decimal(row, "amount_paid")?,
            total_amount: decode_decimal(row, "total_amount")?,
            ref_no: row.try_get("ref_no")?,
            narration: row.try_get("narration")?,
            doc_of_proof_url: row.try_get("doc_of_proof_url")?,
            created_date: row.try_get("created_date")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn decode_decimal(row: &SqliteRow, column: &str) -> Result<Option<Decimal>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|s| {
        Decimal::from_str(&s).map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    })
    .transpose()
}

#[derive(Debug, Deserialize)]
pub struct PaymentCreate {
    pub posting_date: Option<NaiveDate>,
    pub booking_remarks: Option<String>,
    pub date_of_payment: Option<NaiveDate>,
    pub payment_mode: Option<String>,
    pub payment_source: Option<String>,
    pub amount_paid: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub ref_no: Option<String>,
    pub narration: Option<String>,
    pub doc_of_proof_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentUpdate {
    pub posting_date: Option<NaiveDate>,
    pub booking_remarks: Option<String>,
    pub date_of_payment: Option<NaiveDate>,
    pub payment_mode: Option<String>,
    pub payment_source: Option<String>,
    pub amount_paid: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub ref_no: Option<String>,
    pub narration: Option<String>,
    pub doc_of_proof_url: Option<String>,
}

/// Aggregate totals over a filtered set of payments.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PaymentSummary {
    pub total_payments: i64,
    pub total_amount_paid: Decimal,
    pub total_amount: Decimal,
}
