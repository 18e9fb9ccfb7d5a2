use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Document, DocumentCreate, DocumentUpdate};
use crate::error::ApiError;
use crate::services::documents::{DocumentFilter, DocumentService};
use crate::services::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DocumentListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

fn service(state: &AppState) -> DocumentService {
    DocumentService::new(state.pool.clone(), state.upload_dir.clone())
}

/// POST /documents/upload - Multipart upload. Expects a `file` part;
/// `party_name` and `type` parts are optional metadata.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Document>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut party_name: Option<String> = None;
    let mut doc_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                let name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::bad_request("File part must have a filename"))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                file = Some((name, data.to_vec()));
            }
            Some("party_name") => {
                party_name = field.text().await.ok();
            }
            Some("type") => {
                doc_type = field.text().await.ok();
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| ApiError::bad_request("Missing file part in upload"))?;

    let document = service(&state)
        .store_upload(&file_name, &data, party_name, doc_type)
        .await?;
    Ok(Json(document))
}

/// POST /documents - Record a document without uploading a file
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<DocumentCreate>,
) -> Result<Json<Document>, ApiError> {
    let document = service(&state).insert(payload).await?;
    Ok(Json(document))
}

/// GET /documents
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DocumentListQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = service(&state)
        .list(
            DocumentFilter {
                status: query.status,
                doc_type: query.doc_type,
            },
            Page::new(query.skip, query.limit),
        )
        .await?;
    Ok(Json(documents))
}

/// GET /documents/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    let document = service(&state).get(id).await?;
    Ok(Json(document))
}

/// PUT /documents/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<DocumentUpdate>,
) -> Result<Json<Document>, ApiError> {
    let document = service(&state).update(id, changes).await?;
    Ok(Json(document))
}

/// PATCH /documents/:id/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<Document>, ApiError> {
    let document = service(&state).set_status(id, payload.status).await?;
    Ok(Json(document))
}

/// DELETE /documents/:id - Removes the stored file, then the record
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    service(&state).delete(id).await?;
    Ok(Json(json!({"message": "Document deleted successfully"})))
}
