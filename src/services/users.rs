use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::database::models::{User, UserCreate, UserRole, UserUpdate};
use crate::database::StoreError;
use crate::services::Page;

/// Credential store operations over the `users` table.
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user. The password hash must already be computed;
    /// plain passwords never reach this layer.
    pub async fn create(&self, payload: UserCreate, password_hash: String) -> Result<User, StoreError> {
        if self.email_taken(&payload.email, None).await? {
            return Err(StoreError::Conflict(format!(
                "Email {} is already registered",
                payload.email
            )));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, name, email, phone_no, location, password, role, created_date, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone_no)
        .bind(&payload.location)
        .bind(&password_hash)
        .bind(payload.role)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("User not found".to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn list(&self, role: Option<UserRole>, page: Page) -> Result<Vec<User>, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM users WHERE 1=1");
        if let Some(role) = role {
            qb.push(" AND role = ").push_bind(role);
        }
        qb.push(" ORDER BY rowid LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.skip);

        Ok(qb.build_query_as::<User>().fetch_all(&self.pool).await?)
    }

    /// Partial update: only supplied fields are overwritten.
    pub async fn update(&self, id: Uuid, changes: UserUpdate) -> Result<User, StoreError> {
        // Resolve first so an unknown id is a NotFound, not a silent no-op
        let _existing = self.get(id).await?;

        if let Some(email) = &changes.email {
            if self.email_taken(email, Some(id)).await? {
                return Err(StoreError::Conflict(format!(
                    "Email {} is already registered",
                    email
                )));
            }
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE users SET updated_at = ");
        qb.push_bind(Utc::now());
        if let Some(name) = changes.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(email) = changes.email {
            qb.push(", email = ").push_bind(email);
        }
        if let Some(phone_no) = changes.phone_no {
            qb.push(", phone_no = ").push_bind(phone_no);
        }
        if let Some(location) = changes.location {
            qb.push(", location = ").push_bind(location);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.build().execute(&self.pool).await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    pub async fn reset_password(&self, id: Uuid, password_hash: String) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET password = ?, updated_at = ? WHERE id = ?")
            .bind(&password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn email_taken(&self, email: &str, excluding: Option<Uuid>) -> Result<bool, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM users WHERE email = ");
        qb.push_bind(email);
        if let Some(id) = excluding {
            qb.push(" AND id != ").push_bind(id);
        }
        let count: (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(count.0 > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager;

    async fn service() -> UserService {
        let pool = manager::connect_in_memory().await.unwrap();
        manager::bootstrap(&pool).await.unwrap();
        UserService::new(pool)
    }

    fn owner_payload(email: &str) -> UserCreate {
        UserCreate {
            name: "Asha".to_string(),
            email: email.to_string(),
            phone_no: None,
            location: None,
            password: String::new(),
            role: UserRole::Owner,
        }
    }

    #[tokio::test]
    async fn create_and_fetch_by_email() {
        let svc = service().await;
        let user = svc
            .create(owner_payload("asha@example.com"), "hash".to_string())
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Owner);

        let found = svc.find_by_email("asha@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(svc.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = service().await;
        svc.create(owner_payload("asha@example.com"), "hash".to_string())
            .await
            .unwrap();
        let err = svc
            .create(owner_payload("asha@example.com"), "hash".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let svc = service().await;
        let mut payload = owner_payload("asha@example.com");
        payload.phone_no = Some("123".to_string());
        let user = svc.create(payload, "hash".to_string()).await.unwrap();

        let updated = svc
            .update(
                user.id,
                UserUpdate {
                    name: Some("Asha K".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Asha K");
        assert_eq!(updated.phone_no.as_deref(), Some("123"));
        assert_eq!(updated.email, "asha@example.com");
    }

    #[tokio::test]
    async fn delete_unknown_user_is_not_found() {
        let svc = service().await;
        let err = svc.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_role() {
        let svc = service().await;
        svc.create(owner_payload("o@example.com"), "h".to_string())
            .await
            .unwrap();
        let mut acct = owner_payload("a@example.com");
        acct.role = UserRole::Accountant;
        svc.create(acct, "h".to_string()).await.unwrap();

        let all = svc.list(None, Page::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let accountants = svc
            .list(Some(UserRole::Accountant), Page::default())
            .await
            .unwrap();
        assert_eq!(accountants.len(), 1);
        assert_eq!(accountants[0].email, "a@example.com");
    }
}
