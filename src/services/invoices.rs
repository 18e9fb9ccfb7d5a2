use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::database::models::{Invoice, InvoiceCreate, InvoiceUpdate};
use crate::database::StoreError;
use crate::services::Page;

/// Filters accepted by the invoice listing.
#[derive(Debug, Default)]
pub struct InvoiceFilter {
    pub category: Option<String>,
    pub accounting_type: Option<String>,
}

pub struct InvoiceService {
    pool: SqlitePool,
}

impl InvoiceService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an invoice. A supplied doc_id must resolve to an existing
    /// document.
    pub async fn create(&self, payload: InvoiceCreate) -> Result<Invoice, StoreError> {
        if let Some(doc_id) = payload.doc_id {
            self.ensure_document_exists(doc_id).await?;
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO invoice (id, doc_id, category, accounting_type, invoice_details, created_date, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(payload.doc_id)
        .bind(&payload.category)
        .bind(&payload.accounting_type)
        .bind(payload.invoice_details.map(Json))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Invoice, StoreError> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoice WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("Invoice not found".to_string()))
    }

    pub async fn list(&self, filter: InvoiceFilter, page: Page) -> Result<Vec<Invoice>, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM invoice WHERE 1=1");
        if let Some(category) = filter.category {
            qb.push(" AND category = ").push_bind(category);
        }
        if let Some(accounting_type) = filter.accounting_type {
            qb.push(" AND accounting_type = ").push_bind(accounting_type);
        }
        qb.push(" ORDER BY rowid LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.skip);

        Ok(qb.build_query_as::<Invoice>().fetch_all(&self.pool).await?)
    }

    pub async fn update(&self, id: Uuid, changes: InvoiceUpdate) -> Result<Invoice, StoreError> {
        let _existing = self.get(id).await?;

        if let Some(doc_id) = changes.doc_id {
            self.ensure_document_exists(doc_id).await?;
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE invoice SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(doc_id) = changes.doc_id {
            qb.push(", doc_id = ").push_bind(doc_id);
        }
        if let Some(category) = changes.category {
            qb.push(", category = ").push_bind(category);
        }
        if let Some(accounting_type) = changes.accounting_type {
            qb.push(", accounting_type = ").push_bind(accounting_type);
        }
        if let Some(invoice_details) = changes.invoice_details {
            qb.push(", invoice_details = ").push_bind(Json(invoice_details));
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.build().execute(&self.pool).await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM invoice WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Invoice not found".to_string()));
        }
        Ok(())
    }

    pub async fn list_for_document(&self, doc_id: Uuid) -> Result<Vec<Invoice>, StoreError> {
        Ok(sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoice WHERE doc_id = ? ORDER BY rowid",
        )
        .bind(doc_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn list_for_category(&self, category: &str) -> Result<Vec<Invoice>, StoreError> {
        Ok(sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoice WHERE category = ? ORDER BY rowid",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn ensure_document_exists(&self, doc_id: Uuid) -> Result<(), StoreError> {
        let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM document WHERE id = ?")
            .bind(doc_id)
            .fetch_optional(&self.pool)
            .await?;
        if found.is_none() {
            return Err(StoreError::NotFound("Document not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager;
    use crate::database::models::InvoiceDetail;

    async fn service() -> InvoiceService {
        let pool = manager::connect_in_memory().await.unwrap();
        manager::bootstrap(&pool).await.unwrap();
        InvoiceService::new(pool)
    }

    #[tokio::test]
    async fn create_rejects_unknown_document() {
        let svc = service().await;
        let err = svc
            .create(InvoiceCreate {
                doc_id: Some(Uuid::new_v4()),
                category: None,
                accounting_type: None,
                invoice_details: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn details_round_trip_and_partial_update() {
        let svc = service().await;
        let invoice = svc
            .create(InvoiceCreate {
                doc_id: None,
                category: Some("purchase".to_string()),
                accounting_type: Some("accrual".to_string()),
                invoice_details: Some(vec![InvoiceDetail {
                    label: "GST".to_string(),
                    value: "18%".to_string(),
                    status: "active".to_string(),
                }]),
            })
            .await
            .unwrap();

        let details = invoice.invoice_details.as_ref().unwrap();
        assert_eq!(details.0.len(), 1);
        assert_eq!(details.0[0].label, "GST");

        let updated = svc
            .update(
                invoice.id,
                InvoiceUpdate {
                    category: Some("sales".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.category.as_deref(), Some("sales"));
        assert_eq!(updated.accounting_type.as_deref(), Some("accrual"));
        assert!(updated.invoice_details.is_some());
    }

    #[tokio::test]
    async fn category_listing_filters() {
        let svc = service().await;
        for category in ["purchase", "sales", "purchase"] {
            svc.create(InvoiceCreate {
                doc_id: None,
                category: Some(category.to_string()),
                accounting_type: None,
                invoice_details: None,
            })
            .await
            .unwrap();
        }

        let purchases = svc.list_for_category("purchase").await.unwrap();
        assert_eq!(purchases.len(), 2);

        let filtered = svc
            .list(
                InvoiceFilter {
                    category: Some("sales".to_string()),
                    ..Default::default()
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }
}
