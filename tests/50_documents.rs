mod common;

use anyhow::Result;
use reqwest::multipart;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{spawn_app, TestApp};

async fn upload_document(app: &TestApp, token: &str, file_name: &str) -> Result<Value> {
    let form = multipart::Form::new()
        .part(
            "file",
            multipart::Part::bytes(b"pdf-bytes".to_vec()).file_name(file_name.to_string()),
        )
        .text("party_name", "Acme Corporation")
        .text("type", "invoice");

    let resp = app
        .client
        .post(app.url("/documents/upload"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await?;
    anyhow::ensure!(resp.status().is_success(), "upload failed: {}", resp.status());
    Ok(resp.json().await?)
}

#[tokio::test]
async fn upload_stores_file_with_uploaded_status() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.register_and_login("owner@example.com", "OWNER").await?;

    let doc = upload_document(&app, &token, "scan.pdf").await?;
    assert_eq!(doc["file_name"], "scan.pdf");
    assert_eq!(doc["status"], "uploaded");
    assert_eq!(doc["party_name"], "Acme Corporation");
    assert_eq!(doc["type"], "invoice");

    // Stored under a collision-resistant name, not the original one
    let stored = doc["file_url"].as_str().unwrap();
    assert!(stored.ends_with(".pdf"));
    assert!(!stored.ends_with("scan.pdf"));
    assert!(std::path::Path::new(stored).exists());
    Ok(())
}

#[tokio::test]
async fn upload_without_file_part_is_bad_request() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.register_and_login("owner@example.com", "OWNER").await?;

    let form = multipart::Form::new().text("party_name", "Acme");
    let resp = app
        .client
        .post(app.url("/documents/upload"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn status_patch_changes_only_status() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.register_and_login("owner@example.com", "OWNER").await?;
    let doc = upload_document(&app, &token, "scan.pdf").await?;
    let id = doc["id"].as_str().unwrap();

    let resp = app
        .patch_authed(
            &format!("/documents/{}/status", id),
            &token,
            &json!({"status": "verified"}),
        )
        .await?;
    let body: Value = resp.json().await?;
    assert_eq!(body["status"], "verified");
    assert_eq!(body["party_name"], "Acme Corporation");
    Ok(())
}

#[tokio::test]
async fn delete_removes_record_and_stored_file() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.register_and_login("owner@example.com", "OWNER").await?;
    let doc = upload_document(&app, &token, "scan.pdf").await?;
    let id = doc["id"].as_str().unwrap();
    let stored = doc["file_url"].as_str().unwrap().to_string();

    let resp = app.delete_authed(&format!("/documents/{}", id), &token).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!std::path::Path::new(&stored).exists());

    let resp = app.get_authed(&format!("/documents/{}", id), &token).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_of_unknown_document_is_not_found() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.register_and_login("owner@example.com", "OWNER").await?;

    let resp = app
        .delete_authed(&format!("/documents/{}", uuid::Uuid::new_v4()), &token)
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn listing_filters_by_status() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.register_and_login("owner@example.com", "OWNER").await?;
    let doc = upload_document(&app, &token, "a.pdf").await?;
    upload_document(&app, &token, "b.pdf").await?;

    app.patch_authed(
        &format!("/documents/{}/status", doc["id"].as_str().unwrap()),
        &token,
        &json!({"status": "verified"}),
    )
    .await?;

    let verified: Vec<Value> = app
        .get_authed("/documents?status=verified", &token)
        .await?
        .json()
        .await?;
    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0]["file_name"], "a.pdf");
    Ok(())
}
