use anyhow::{Context, Result};
use serde_json::{json, Value};

use ledgerdesk::app::app;
use ledgerdesk::database::manager;
use ledgerdesk::fixture::DashboardFixture;
use ledgerdesk::state::AppState;

/// One fully wired server per test, bound to an ephemeral port with its own
/// in-memory database and a throwaway upload directory.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub pool: sqlx::SqlitePool,
}

pub async fn spawn_app() -> Result<TestApp> {
    let pool = manager::connect_in_memory().await?;
    manager::bootstrap(&pool).await?;

    let upload_dir =
        std::env::temp_dir().join(format!("ledgerdesk-it-{}", uuid::Uuid::new_v4()));
    let state = AppState::new(pool.clone(), DashboardFixture::sample(), upload_dir);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("test server");
    });

    Ok(TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        pool,
    })
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "role": role,
            }))
            .send()
            .await?)
    }

    pub async fn login_token(&self, email: &str, password: &str) -> Result<String> {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({"email": email, "password": password}))
            .send()
            .await?;
        anyhow::ensure!(resp.status().is_success(), "login failed: {}", resp.status());

        let body: Value = resp.json().await?;
        body["access_token"]
            .as_str()
            .map(|s| s.to_string())
            .context("login response missing access_token")
    }

    /// Register a user and return a bearer token for it.
    pub async fn register_and_login(&self, email: &str, role: &str) -> Result<String> {
        let resp = self.register("Test User", email, "pass-1234", role).await?;
        anyhow::ensure!(
            resp.status().is_success(),
            "register failed: {}",
            resp.status()
        );
        self.login_token(email, "pass-1234").await
    }

    pub async fn get_authed(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    pub async fn post_authed(
        &self,
        path: &str,
        token: &str,
        body: &Value,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn put_authed(
        &self,
        path: &str,
        token: &str,
        body: &Value,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn patch_authed(
        &self,
        path: &str,
        token: &str,
        body: &Value,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn delete_authed(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }
}
