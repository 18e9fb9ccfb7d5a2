use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::database::models::{Supplier, SupplierCreate, SupplierUpdate};
use crate::database::StoreError;
use crate::services::Page;

/// Filters accepted by the supplier listing.
#[derive(Debug, Default)]
pub struct SupplierFilter {
    pub currency_type: Option<String>,
    pub gst_status: Option<String>,
}

/// Supplier CRUD plus the supplier side of the tenancy graph.
pub struct SupplierService {
    pool: SqlitePool,
}

impl SupplierService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: SupplierCreate) -> Result<Supplier, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO supplier (id, name, ledger_name, currency_type, gst_status, gst, address, created_date, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.ledger_name)
        .bind(&payload.currency_type)
        .bind(&payload.gst_status)
        .bind(&payload.gst)
        .bind(payload.address.map(Json))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Supplier, StoreError> {
        sqlx::query_as::<_, Supplier>("SELECT * FROM supplier WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("Supplier not found".to_string()))
    }

    pub async fn list(&self, filter: SupplierFilter, page: Page) -> Result<Vec<Supplier>, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM supplier WHERE 1=1");
        if let Some(currency_type) = filter.currency_type {
            qb.push(" AND currency_type = ").push_bind(currency_type);
        }
        if let Some(gst_status) = filter.gst_status {
            qb.push(" AND gst_status = ").push_bind(gst_status);
        }
        qb.push(" ORDER BY rowid LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.skip);

        Ok(qb.build_query_as::<Supplier>().fetch_all(&self.pool).await?)
    }

    pub async fn update(&self, id: Uuid, changes: SupplierUpdate) -> Result<Supplier, StoreError> {
        let _existing = self.get(id).await?;

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE supplier SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(name) = changes.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(ledger_name) = changes.ledger_name {
            qb.push(", ledger_name = ").push_bind(ledger_name);
        }
        if let Some(currency_type) = changes.currency_type {
            qb.push(", currency_type = ").push_bind(currency_type);
        }
        if let Some(gst_status) = changes.gst_status {
            qb.push(", gst_status = ").push_bind(gst_status);
        }
        if let Some(gst) = changes.gst {
            qb.push(", gst = ").push_bind(gst);
        }
        if let Some(address) = changes.address {
            qb.push(", address = ").push_bind(Json(address));
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.build().execute(&self.pool).await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM supplier WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Supplier not found".to_string()));
        }
        Ok(())
    }

    /// Replace the full set of companies a supplier serves. The supplier and
    /// every referenced company must exist; the first missing company id is
    /// named in the error.
    pub async fn assign_to_companies(
        &self,
        supplier_id: Uuid,
        company_ids: &[Uuid],
    ) -> Result<(), StoreError> {
        let _supplier = self.get(supplier_id).await?;

        for company_id in company_ids {
            let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM company WHERE id = ?")
                .bind(company_id)
                .fetch_optional(&self.pool)
                .await?;
            if found.is_none() {
                return Err(StoreError::NotFound(format!(
                    "Company with id {} not found",
                    company_id
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM company_supplier_relation WHERE supplier_id = ?")
            .bind(supplier_id)
            .execute(&mut *tx)
            .await?;

        let now = Utc::now();
        for company_id in company_ids {
            sqlx::query(
                "INSERT INTO company_supplier_relation (id, company_id, supplier_id, created_at)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4())
            .bind(company_id)
            .bind(supplier_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Suppliers linked to the given company. The company must exist.
    pub async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<Supplier>, StoreError> {
        let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM company WHERE id = ?")
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        if found.is_none() {
            return Err(StoreError::NotFound("Company not found".to_string()));
        }

        Ok(sqlx::query_as::<_, Supplier>(
            "SELECT s.* FROM supplier s
             JOIN company_supplier_relation r ON r.supplier_id = s.id
             WHERE r.company_id = ?
             ORDER BY s.rowid",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Delete exactly one join row; NotFound when no row matched.
    pub async fn remove_from_company(
        &self,
        company_id: Uuid,
        supplier_id: Uuid,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "DELETE FROM company_supplier_relation WHERE company_id = ? AND supplier_id = ?",
        )
        .bind(company_id)
        .bind(supplier_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(
                "Supplier-Company relationship not found".to_string(),
            ));
        }
        Ok(())
    }
}
