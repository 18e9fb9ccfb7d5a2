use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::database::models::{Company, CompanyCreate, CompanyUpdate, UserRole};
use crate::database::StoreError;
use crate::services::Page;

/// Company CRUD plus the accountant side of the tenancy graph.
pub struct CompanyService {
    pool: SqlitePool,
}

impl CompanyService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CompanyCreate) -> Result<Company, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO company (id, name, email, location, base_currency, gst_number, accounting_month, contact_person, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(payload.location.map(Json))
        .bind(&payload.base_currency)
        .bind(&payload.gst_number)
        .bind(payload.accounting_month)
        .bind(payload.contact_person.map(Json))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Company, StoreError> {
        sqlx::query_as::<_, Company>("SELECT * FROM company WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("Company not found".to_string()))
    }

    pub async fn list(&self, page: Page) -> Result<Vec<Company>, StoreError> {
        Ok(sqlx::query_as::<_, Company>(
            "SELECT * FROM company ORDER BY rowid LIMIT ? OFFSET ?",
        )
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Companies assigned to the given user through company_user_relation.
    pub async fn list_for_user(&self, user_id: Uuid, page: Page) -> Result<Vec<Company>, StoreError> {
        Ok(sqlx::query_as::<_, Company>(
            "SELECT c.* FROM company c
             JOIN company_user_relation r ON r.company_id = c.id
             WHERE r.user_id = ?
             ORDER BY c.rowid LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn update(&self, id: Uuid, changes: CompanyUpdate) -> Result<Company, StoreError> {
        let _existing = self.get(id).await?;

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE company SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(name) = changes.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(email) = changes.email {
            qb.push(", email = ").push_bind(email);
        }
        if let Some(location) = changes.location {
            qb.push(", location = ").push_bind(Json(location));
        }
        if let Some(base_currency) = changes.base_currency {
            qb.push(", base_currency = ").push_bind(base_currency);
        }
        if let Some(gst_number) = changes.gst_number {
            qb.push(", gst_number = ").push_bind(gst_number);
        }
        if let Some(accounting_month) = changes.accounting_month {
            qb.push(", accounting_month = ").push_bind(accounting_month);
        }
        if let Some(contact_person) = changes.contact_person {
            qb.push(", contact_person = ").push_bind(Json(contact_person));
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.build().execute(&self.pool).await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM company WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Company not found".to_string()));
        }
        Ok(())
    }

    /// Replace the full assignment set for an accountant: delete every
    /// existing row for the user, then insert one row per requested company.
    /// Runs in one transaction so the set is never half-replaced, but two
    /// concurrent calls still resolve as last-writer-wins.
    pub async fn assign_accountant(
        &self,
        user_id: Uuid,
        company_ids: &[Uuid],
    ) -> Result<(), StoreError> {
        let accountant: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE id = ? AND role = ?")
                .bind(user_id)
                .bind(UserRole::Accountant)
                .fetch_optional(&self.pool)
                .await?;
        if accountant.is_none() {
            return Err(StoreError::NotFound("Accountant not found".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM company_user_relation WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let now = Utc::now();
        for company_id in company_ids {
            sqlx::query(
                "INSERT INTO company_user_relation (id, company_id, user_id, created_at)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4())
            .bind(company_id)
            .bind(user_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
