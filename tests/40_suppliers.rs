mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{spawn_app, TestApp};

async fn create_supplier(app: &TestApp, token: &str, name: &str) -> Result<String> {
    let resp = app
        .post_authed(
            "/suppliers",
            token,
            &json!({"name": name, "ledger_name": format!("{} - Ledger", name)}),
        )
        .await?;
    anyhow::ensure!(resp.status().is_success(), "create supplier failed");
    let body: Value = resp.json().await?;
    Ok(body["id"].as_str().unwrap().to_string())
}

async fn create_company(app: &TestApp, token: &str, name: &str) -> Result<String> {
    let resp = app
        .post_authed("/companies", token, &json!({"name": name}))
        .await?;
    let body: Value = resp.json().await?;
    Ok(body["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn partial_update_keeps_ledger_name() -> Result<()> {
    let app = spawn_app().await?;
    let owner = app.register_and_login("owner@example.com", "OWNER").await?;
    let id = create_supplier(&app, &owner, "Alpha Steel").await?;

    let resp = app
        .put_authed(
            &format!("/suppliers/{}", id),
            &owner,
            &json!({"name": "Alpha Steel Industries"}),
        )
        .await?;
    let body: Value = resp.json().await?;
    assert_eq!(body["name"], "Alpha Steel Industries");
    assert_eq!(body["ledger_name"], "Alpha Steel - Ledger");
    Ok(())
}

#[tokio::test]
async fn assignment_rejects_missing_company_by_id() -> Result<()> {
    let app = spawn_app().await?;
    let owner = app.register_and_login("owner@example.com", "OWNER").await?;
    let supplier = create_supplier(&app, &owner, "Alpha").await?;
    let missing = uuid::Uuid::new_v4().to_string();

    let resp = app
        .post_authed(
            "/suppliers/assign-to-companies",
            &owner,
            &json!({"supplier_id": supplier, "company_ids": [missing]}),
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await?;
    assert!(body["message"].as_str().unwrap().contains(&missing));
    Ok(())
}

#[tokio::test]
async fn reassignment_replaces_links_and_listing_scopes_by_company() -> Result<()> {
    let app = spawn_app().await?;
    let owner = app.register_and_login("owner@example.com", "OWNER").await?;
    let supplier = create_supplier(&app, &owner, "Alpha").await?;
    let c1 = create_company(&app, &owner, "One").await?;
    let c2 = create_company(&app, &owner, "Two").await?;

    app.post_authed(
        "/suppliers/assign-to-companies",
        &owner,
        &json!({"supplier_id": supplier, "company_ids": [c1]}),
    )
    .await?;
    app.post_authed(
        "/suppliers/assign-to-companies",
        &owner,
        &json!({"supplier_id": supplier, "company_ids": [c2]}),
    )
    .await?;

    let first: Vec<Value> = app
        .get_authed(&format!("/suppliers/company/{}", c1), &owner)
        .await?
        .json()
        .await?;
    assert!(first.is_empty());

    let second: Vec<Value> = app
        .get_authed(&format!("/suppliers/company/{}", c2), &owner)
        .await?
        .json()
        .await?;
    assert_eq!(second.len(), 1);
    assert_eq!(second[0]["name"], "Alpha");
    Ok(())
}

#[tokio::test]
async fn removing_a_link_twice_is_not_found() -> Result<()> {
    let app = spawn_app().await?;
    let owner = app.register_and_login("owner@example.com", "OWNER").await?;
    let supplier = create_supplier(&app, &owner, "Alpha").await?;
    let c1 = create_company(&app, &owner, "One").await?;

    app.post_authed(
        "/suppliers/assign-to-companies",
        &owner,
        &json!({"supplier_id": supplier, "company_ids": [c1]}),
    )
    .await?;

    let path = format!("/suppliers/company/{}/supplier/{}", c1, supplier);
    let resp = app.delete_authed(&path, &owner).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.delete_authed(&path, &owner).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn owner_only_guards_on_assignment_routes() -> Result<()> {
    let app = spawn_app().await?;
    let owner = app.register_and_login("owner@example.com", "OWNER").await?;
    let acct = app
        .register_and_login("acct@example.com", "ACCOUNTANT")
        .await?;
    let supplier = create_supplier(&app, &owner, "Alpha").await?;
    let c1 = create_company(&app, &owner, "One").await?;

    let resp = app
        .post_authed(
            "/suppliers/assign-to-companies",
            &acct,
            &json!({"supplier_id": supplier, "company_ids": [c1]}),
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .delete_authed(
            &format!("/suppliers/company/{}/supplier/{}", c1, supplier),
            &acct,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn listing_filters_by_currency_type() -> Result<()> {
    let app = spawn_app().await?;
    let owner = app.register_and_login("owner@example.com", "OWNER").await?;

    app.post_authed(
        "/suppliers",
        &owner,
        &json!({"name": "Domestic", "currency_type": "INR"}),
    )
    .await?;
    app.post_authed(
        "/suppliers",
        &owner,
        &json!({"name": "Overseas", "currency_type": "USD"}),
    )
    .await?;

    let usd: Vec<Value> = app
        .get_authed("/suppliers?currency_type=USD", &owner)
        .await?
        .json()
        .await?;
    assert_eq!(usd.len(), 1);
    assert_eq!(usd[0]["name"], "Overseas");
    Ok(())
}
