use std::path::PathBuf;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::fixture::DashboardFixture;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub fixture: Arc<DashboardFixture>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(pool: SqlitePool, fixture: DashboardFixture, upload_dir: PathBuf) -> Self {
        Self {
            pool,
            fixture: Arc::new(fixture),
            upload_dir,
        }
    }
}
