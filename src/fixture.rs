use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Static dashboard dataset served by the reporting endpoints. Loaded from a
/// JSON file at startup when one is configured, otherwise a built-in sample
/// set is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardFixture {
    pub invoices: InvoicePipeline,
    pub books: BookStatus,
    pub next_posting: NextPosting,
    pub bank_statements: BankStatements,
    pub recent_transactions: Vec<TransactionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicePipeline {
    pub submitted_processing: i64,
    pub ready_posting: i64,
    pub posted: i64,
    pub exception: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookStatus {
    pub closed: i64,
    pub pending: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextPosting {
    pub sales: i64,
    pub purchases: i64,
    pub expenses: i64,
    pub others: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankStatements {
    pub submitted: i64,
    pub verified: i64,
    pub exceptions: i64,
    pub processed: i64,
    pub posted: i64,
    pub progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEntry {
    pub date: String,
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub customer: String,
    pub amount: i64,
    pub status: String,
}

impl DashboardFixture {
    /// Load from the configured path when set and readable, falling back to
    /// the built-in sample otherwise.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::sample();
        };
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(fixture) => {
                    info!("loaded dashboard fixture from {}", path.display());
                    fixture
                }
                Err(e) => {
                    tracing::warn!(
                        "invalid dashboard fixture at {}: {}, using sample data",
                        path.display(),
                        e
                    );
                    Self::sample()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "cannot read dashboard fixture at {}: {}, using sample data",
                    path.display(),
                    e
                );
                Self::sample()
            }
        }
    }

    pub fn sample() -> Self {
        Self {
            invoices: InvoicePipeline {
                submitted_processing: 847,
                ready_posting: 1245,
                posted: 692,
                exception: 63,
            },
            books: BookStatus {
                closed: 34,
                pending: 6,
            },
            next_posting: NextPosting {
                sales: 2_500_000,
                purchases: 1_820_000,
                expenses: 850_000,
                others: 320_000,
            },
            bank_statements: BankStatements {
                submitted: 156,
                verified: 142,
                exceptions: 8,
                processed: 128,
                posted: 115,
                progress: 87.8,
            },
            recent_transactions: vec![
                TransactionEntry {
                    date: "Aug 20".to_string(),
                    id: "INV-1247".to_string(),
                    entry_type: "Invoice".to_string(),
                    customer: "Acme Corporation".to_string(),
                    amount: 1_245_000,
                    status: "processed".to_string(),
                },
                TransactionEntry {
                    date: "Aug 19".to_string(),
                    id: "PO-892".to_string(),
                    entry_type: "Purchase".to_string(),
                    customer: "Tech Suppliers".to_string(),
                    amount: 875_000,
                    status: "verified".to_string(),
                },
                TransactionEntry {
                    date: "Aug 18".to_string(),
                    id: "EXP-421".to_string(),
                    entry_type: "Expense".to_string(),
                    customer: "Office Maintenance".to_string(),
                    amount: 45_000,
                    status: "pending".to_string(),
                },
                TransactionEntry {
                    date: "Aug 17".to_string(),
                    id: "INV-246".to_string(),
                    entry_type: "Invoice".to_string(),
                    customer: "Beta Enterprises".to_string(),
                    amount: 680_000,
                    status: "exception".to_string(),
                },
            ],
        }
    }
}
