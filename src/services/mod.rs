pub mod companies;
pub mod documents;
pub mod invoices;
pub mod payments;
pub mod suppliers;
pub mod users;

use crate::config;

/// Offset/limit pagination window, clamped to the configured page-size cap.
/// Listing order is always insertion order.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Self {
        let cfg = &config::config().api;
        Self {
            skip: skip.unwrap_or(0).max(0),
            limit: limit
                .unwrap_or(cfg.default_page_size)
                .clamp(1, cfg.max_page_size),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}
