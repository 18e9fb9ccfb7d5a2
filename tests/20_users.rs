mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::spawn_app;

#[tokio::test]
async fn self_update_is_partial() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.register_and_login("asha@example.com", "OWNER").await?;

    let resp = app
        .put_authed("/users/me", &token, &json!({"phone_no": "98765"}))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await?;
    assert_eq!(body["phone_no"], "98765");
    assert_eq!(body["email"], "asha@example.com");
    assert_eq!(body["name"], "Test User");
    Ok(())
}

#[tokio::test]
async fn user_listing_is_owner_only() -> Result<()> {
    let app = spawn_app().await?;
    let owner = app.register_and_login("owner@example.com", "OWNER").await?;
    let acct = app
        .register_and_login("acct@example.com", "ACCOUNTANT")
        .await?;

    let resp = app.get_authed("/users", &acct).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app.get_authed("/users", &owner).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<Value> = resp.json().await?;
    assert_eq!(users.len(), 2);

    let resp = app.get_authed("/users/accountants", &owner).await?;
    let accountants: Vec<Value> = resp.json().await?;
    assert_eq!(accountants.len(), 1);
    assert_eq!(accountants[0]["email"], "acct@example.com");

    let resp = app.get_authed("/users?role=ACCOUNTANT", &owner).await?;
    let filtered: Vec<Value> = resp.json().await?;
    assert_eq!(filtered.len(), 1);
    Ok(())
}

#[tokio::test]
async fn owners_cannot_delete_themselves() -> Result<()> {
    let app = spawn_app().await?;
    let owner = app.register_and_login("owner@example.com", "OWNER").await?;

    let me: Value = app.get_authed("/users/me", &owner).await?.json().await?;
    let my_id = me["id"].as_str().unwrap().to_string();

    let resp = app.delete_authed(&format!("/users/{}", my_id), &owner).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn owner_deletes_another_user() -> Result<()> {
    let app = spawn_app().await?;
    let owner = app.register_and_login("owner@example.com", "OWNER").await?;
    app.register_and_login("acct@example.com", "ACCOUNTANT").await?;

    let accountants: Vec<Value> = app
        .get_authed("/users/accountants", &owner)
        .await?
        .json()
        .await?;
    let acct_id = accountants[0]["id"].as_str().unwrap().to_string();

    let resp = app
        .delete_authed(&format!("/users/{}", acct_id), &owner)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.get_authed(&format!("/users/{}", acct_id), &owner).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn password_reset_takes_effect_on_next_login() -> Result<()> {
    let app = spawn_app().await?;
    let owner = app.register_and_login("owner@example.com", "OWNER").await?;
    app.register_and_login("acct@example.com", "ACCOUNTANT").await?;

    let accountants: Vec<Value> = app
        .get_authed("/users/accountants", &owner)
        .await?
        .json()
        .await?;
    let acct_id = accountants[0]["id"].as_str().unwrap().to_string();

    let resp = app
        .patch_authed(
            &format!("/users/{}/password", acct_id),
            &owner,
            &json!({"password": "new-secret-99"}),
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // Old password no longer works, the new one does
    assert!(app.login_token("acct@example.com", "pass-1234").await.is_err());
    app.login_token("acct@example.com", "new-secret-99").await?;
    Ok(())
}
