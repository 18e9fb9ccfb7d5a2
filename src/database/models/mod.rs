pub mod company;
pub mod document;
pub mod invoice;
pub mod payment;
pub mod supplier;
pub mod user;

pub use company::{AssignAccountantRequest, Company, CompanyCreate, CompanyUpdate};
pub use document::{Document, DocumentCreate, DocumentUpdate};
pub use invoice::{Invoice, InvoiceCreate, InvoiceDetail, InvoiceUpdate};
pub use payment::{Payment, PaymentCreate, PaymentSummary, PaymentUpdate};
pub use supplier::{AssignSupplierRequest, Supplier, SupplierCreate, SupplierUpdate};
pub use user::{User, UserCreate, UserRole, UserUpdate};
