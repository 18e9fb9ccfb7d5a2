use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::database::models::{Payment, PaymentCreate, PaymentSummary, PaymentUpdate};
use crate::database::StoreError;
use crate::services::Page;

/// Filters accepted by the payment listing and summary.
#[derive(Debug, Default)]
pub struct PaymentFilter {
    pub payment_mode: Option<String>,
    pub payment_source: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Posting payment details store. Amounts are persisted as exact decimal
/// text and aggregated in-process so no precision is lost.
pub struct PaymentService {
    pool: SqlitePool,
}

impl PaymentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: PaymentCreate) -> Result<Payment, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO posting_payment_details
             (id, posting_date, booking_remarks, date_of_payment, payment_mode, payment_source,
              amount_paid, total_amount, ref_no, narration, doc_of_proof_url, created_date, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(payload.posting_date)
        .bind(&payload.booking_remarks)
        .bind(payload.date_of_payment)
        .bind(&payload.payment_mode)
        .bind(&payload.payment_source)
        .bind(payload.amount_paid.map(|d| d.to_string()))
        .bind(payload.total_amount.map(|d| d.to_string()))
        .bind(&payload.ref_no)
        .bind(&payload.narration)
        .bind(&payload.doc_of_proof_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Payment, StoreError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM posting_payment_details WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("Payment not found".to_string()))
    }

    pub async fn find_by_ref(&self, ref_no: &str) -> Result<Payment, StoreError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM posting_payment_details WHERE ref_no = ?")
            .bind(ref_no)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound("Payment not found with this reference number".to_string())
            })
    }

    pub async fn list(&self, filter: PaymentFilter, page: Page) -> Result<Vec<Payment>, StoreError> {
        let mut qb = Self::filtered_query(filter);
        qb.push(" ORDER BY rowid LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.skip);

        Ok(qb.build_query_as::<Payment>().fetch_all(&self.pool).await?)
    }

    pub async fn list_date_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Payment>, StoreError> {
        Ok(sqlx::query_as::<_, Payment>(
            "SELECT * FROM posting_payment_details
             WHERE posting_date >= ? AND posting_date <= ?
             ORDER BY rowid",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Count and exact sums over the filtered payments.
    pub async fn summary(&self, filter: PaymentFilter) -> Result<PaymentSummary, StoreError> {
        let mut qb = Self::filtered_query(filter);
        qb.push(" ORDER BY rowid");
        let payments = qb.build_query_as::<Payment>().fetch_all(&self.pool).await?;

        let mut summary = PaymentSummary {
            total_payments: payments.len() as i64,
            total_amount_paid: Decimal::ZERO,
            total_amount: Decimal::ZERO,
        };
        for payment in &payments {
            if let Some(paid) = payment.amount_paid {
                summary.total_amount_paid += paid;
            }
            if let Some(total) = payment.total_amount {
                summary.total_amount += total;
            }
        }
        Ok(summary)
    }

    pub async fn update(&self, id: Uuid, changes: PaymentUpdate) -> Result<Payment, StoreError> {
        let _existing = self.get(id).await?;

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE posting_payment_details SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(posting_date) = changes.posting_date {
            qb.push(", posting_date = ").push_bind(posting_date);
        }
        if let Some(booking_remarks) = changes.booking_remarks {
            qb.push(", booking_remarks = ").push_bind(booking_remarks);
        }
        if let Some(date_of_payment) = changes.date_of_payment {
            qb.push(", date_of_payment = ").push_bind(date_of_payment);
        }
        if let Some(payment_mode) = changes.payment_mode {
            qb.push(", payment_mode = ").push_bind(payment_mode);
        }
        if let Some(payment_source) = changes.payment_source {
            qb.push(", payment_source = ").push_bind(payment_source);
        }
        if let Some(amount_paid) = changes.amount_paid {
            qb.push(", amount_paid = ").push_bind(amount_paid.to_string());
        }
        if let Some(total_amount) = changes.total_amount {
            qb.push(", total_amount = ").push_bind(total_amount.to_string());
        }
        if let Some(ref_no) = changes.ref_no {
            qb.push(", ref_no = ").push_bind(ref_no);
        }
        if let Some(narration) = changes.narration {
            qb.push(", narration = ").push_bind(narration);
        }
        if let Some(doc_of_proof_url) = changes.doc_of_proof_url {
            qb.push(", doc_of_proof_url = ").push_bind(doc_of_proof_url);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.build().execute(&self.pool).await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM posting_payment_details WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Payment not found".to_string()));
        }
        Ok(())
    }

    fn filtered_query(filter: PaymentFilter) -> QueryBuilder<'static, Sqlite> {
        let mut qb =
            QueryBuilder::<Sqlite>::new("SELECT * FROM posting_payment_details WHERE 1=1");
        if let Some(payment_mode) = filter.payment_mode {
            qb.push(" AND payment_mode = ").push_bind(payment_mode);
        }
        if let Some(payment_source) = filter.payment_source {
            qb.push(" AND payment_source = ").push_bind(payment_source);
        }
        if let Some(start_date) = filter.start_date {
            qb.push(" AND posting_date >= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            qb.push(" AND posting_date <= ").push_bind(end_date);
        }
        qb
    }
}
