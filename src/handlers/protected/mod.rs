pub mod companies;
pub mod dashboard;
pub mod documents;
pub mod invoices;
pub mod payments;
pub mod suppliers;
pub mod users;
