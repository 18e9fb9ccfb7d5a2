use std::path::{Path, PathBuf};

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use crate::database::models::{Document, DocumentCreate, DocumentUpdate};
use crate::database::StoreError;
use crate::services::Page;

/// Filters accepted by the document listing.
#[derive(Debug, Default)]
pub struct DocumentFilter {
    pub status: Option<String>,
    pub doc_type: Option<String>,
}

/// Document CRUD plus upload storage on local disk.
pub struct DocumentService {
    pool: SqlitePool,
    upload_dir: PathBuf,
}

impl DocumentService {
    pub fn new(pool: SqlitePool, upload_dir: PathBuf) -> Self {
        Self { pool, upload_dir }
    }

    /// Store an uploaded file under a collision-resistant name and record it.
    /// The file write and the insert are two separate steps: a crash between
    /// them leaves an orphan file, never a dangling record.
    pub async fn store_upload(
        &self,
        original_name: &str,
        data: &[u8],
        party_name: Option<String>,
        doc_type: Option<String>,
    ) -> Result<Document, StoreError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let stored = stored_name(original_name);
        let path = self.upload_dir.join(&stored);
        tokio::fs::write(&path, data).await?;

        self.insert(DocumentCreate {
            file_name: original_name.to_string(),
            file_url: path.to_string_lossy().into_owned(),
            status: "uploaded".to_string(),
            doc_type,
            party_name,
        })
        .await
    }

    pub async fn insert(&self, payload: DocumentCreate) -> Result<Document, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO document (id, file_name, file_url, status, type, party_name, upload_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&payload.file_name)
        .bind(&payload.file_url)
        .bind(&payload.status)
        .bind(&payload.doc_type)
        .bind(&payload.party_name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Document, StoreError> {
        sqlx::query_as::<_, Document>("SELECT * FROM document WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound("Document not found".to_string()))
    }

    pub async fn list(&self, filter: DocumentFilter, page: Page) -> Result<Vec<Document>, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM document WHERE 1=1");
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(doc_type) = filter.doc_type {
            qb.push(" AND type = ").push_bind(doc_type);
        }
        qb.push(" ORDER BY rowid LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.skip);

        Ok(qb.build_query_as::<Document>().fetch_all(&self.pool).await?)
    }

    pub async fn update(&self, id: Uuid, changes: DocumentUpdate) -> Result<Document, StoreError> {
        let _existing = self.get(id).await?;

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE document SET file_name = file_name");
        if let Some(file_name) = changes.file_name {
            qb.push(", file_name = ").push_bind(file_name);
        }
        if let Some(file_url) = changes.file_url {
            qb.push(", file_url = ").push_bind(file_url);
        }
        if let Some(status) = changes.status {
            qb.push(", status = ").push_bind(status);
        }
        if let Some(doc_type) = changes.doc_type {
            qb.push(", type = ").push_bind(doc_type);
        }
        if let Some(party_name) = changes.party_name {
            qb.push(", party_name = ").push_bind(party_name);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.build().execute(&self.pool).await?;

        self.get(id).await
    }

    pub async fn set_status(&self, id: Uuid, status: String) -> Result<Document, StoreError> {
        self.update(
            id,
            DocumentUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete the record and its stored file. The file removal is
    /// best-effort; an unknown id performs no file operation at all.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let document = self.get(id).await?;

        let path = Path::new(&document.file_url);
        if path.exists() {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("failed to remove stored file {}: {}", document.file_url, e);
            }
        }

        sqlx::query("DELETE FROM document WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Random stored name preserving the original extension, so concurrent
/// uploads of identically named files never collide.
fn stored_name(original_name: &str) -> String {
    match Path::new(original_name).extension() {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_string_lossy()),
        None => Uuid::new_v4().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager;

    async fn service(upload_dir: PathBuf) -> DocumentService {
        let pool = manager::connect_in_memory().await.unwrap();
        manager::bootstrap(&pool).await.unwrap();
        DocumentService::new(pool, upload_dir)
    }

    fn temp_upload_dir() -> PathBuf {
        std::env::temp_dir().join(format!("ledgerdesk-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn stored_name_keeps_extension_and_is_unique() {
        let a = stored_name("invoice.pdf");
        let b = stored_name("invoice.pdf");
        assert!(a.ends_with(".pdf"));
        assert!(b.ends_with(".pdf"));
        assert_ne!(a, b);
        assert!(!stored_name("README").contains('.'));
    }

    #[tokio::test]
    async fn upload_writes_file_and_delete_removes_it() {
        let dir = temp_upload_dir();
        let svc = service(dir.clone()).await;

        let doc = svc
            .store_upload("scan.pdf", b"pdf-bytes", Some("Acme".to_string()), None)
            .await
            .unwrap();
        assert_eq!(doc.file_name, "scan.pdf");
        assert_eq!(doc.status, "uploaded");
        assert!(Path::new(&doc.file_url).exists());

        svc.delete(doc.id).await.unwrap();
        assert!(!Path::new(&doc.file_url).exists());
        assert!(matches!(
            svc.get(doc.id).await.unwrap_err(),
            StoreError::NotFound(_)
        ));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let svc = service(temp_upload_dir()).await;
        let err = svc.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn status_patch_changes_only_status() {
        let dir = temp_upload_dir();
        let svc = service(dir.clone()).await;
        let doc = svc
            .store_upload("scan.pdf", b"x", Some("Acme".to_string()), Some("invoice".to_string()))
            .await
            .unwrap();

        let updated = svc.set_status(doc.id, "verified".to_string()).await.unwrap();
        assert_eq!(updated.status, "verified");
        assert_eq!(updated.party_name.as_deref(), Some("Acme"));
        assert_eq!(updated.doc_type.as_deref(), Some("invoice"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
