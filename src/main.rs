use std::path::{Path, PathBuf};

use ledgerdesk::app::app;
use ledgerdesk::config;
use ledgerdesk::database::manager;
use ledgerdesk::fixture::DashboardFixture;
use ledgerdesk::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ledgerdesk=info,tower_http=info")),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting ledgerdesk in {:?} mode", config.environment);

    let pool = manager::connect(&config.database.url)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to {}: {}", config.database.url, e));
    manager::bootstrap(&pool).await.expect("schema bootstrap");

    let fixture = DashboardFixture::load(
        config
            .storage
            .dashboard_fixture_path
            .as_deref()
            .map(Path::new),
    );

    let state = AppState::new(pool, fixture, PathBuf::from(&config.storage.upload_dir));
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("LEDGERDESK_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("ledgerdesk listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
