use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config;
use crate::database::StoreError;

/// Open the application pool against the configured database URL.
/// Foreign keys are enforced per connection; the database file is created
/// on first run.
pub async fn connect(database_url: &str) -> Result<SqlitePool, StoreError> {
    let cfg = &config::config().database;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.connection_timeout))
        .connect_with(options)
        .await?;

    info!("Connected database pool for: {}", database_url);
    Ok(pool)
}

/// Single-connection in-memory database, used by the test harness so each
/// test run starts from an empty schema.
pub async fn connect_in_memory() -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    // One connection only: every pooled connection of an in-memory SQLite
    // database would otherwise see its own separate database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Create all tables if they do not exist yet. Mirrors the entity model:
/// users, company, document, invoice, supplier, posting_payment_details,
/// plus the two many-to-many join tables.
pub async fn bootstrap(pool: &SqlitePool) -> Result<(), StoreError> {
    const TABLES: &[&str] = &[
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone_no TEXT,
            location TEXT,
            password TEXT NOT NULL,
            role TEXT NOT NULL,
            created_date TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS company (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            location TEXT,
            base_currency TEXT NOT NULL DEFAULT 'INR',
            gst_number TEXT,
            accounting_month INTEGER,
            contact_person TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS document (
            id TEXT PRIMARY KEY,
            file_name TEXT NOT NULL,
            file_url TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            type TEXT,
            party_name TEXT,
            upload_date TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS invoice (
            id TEXT PRIMARY KEY,
            doc_id TEXT REFERENCES document(id) ON DELETE SET NULL,
            category TEXT,
            accounting_type TEXT,
            invoice_details TEXT,
            created_date TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS supplier (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            ledger_name TEXT,
            currency_type TEXT NOT NULL DEFAULT 'INR',
            gst_status TEXT,
            gst TEXT,
            address TEXT,
            created_date TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS posting_payment_details (
            id TEXT PRIMARY KEY,
            posting_date TEXT,
            booking_remarks TEXT,
            date_of_payment TEXT,
            payment_mode TEXT,
            payment_source TEXT,
            amount_paid TEXT,
            total_amount TEXT,
            ref_no TEXT,
            narration TEXT,
            doc_of_proof_url TEXT,
            created_date TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS company_user_relation (
            id TEXT PRIMARY KEY,
            company_id TEXT NOT NULL REFERENCES company(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS company_supplier_relation (
            id TEXT PRIMARY KEY,
            company_id TEXT NOT NULL REFERENCES company(id) ON DELETE CASCADE,
            supplier_id TEXT NOT NULL REFERENCES supplier(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL
        )",
    ];

    for ddl in TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }

    Ok(())
}
