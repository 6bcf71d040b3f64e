//! Repository implementations for domain records
//!
//! Each repository owns the SQL for one collection and maps between
//! database rows and domain types:
//! - Runtime-checked queries with `FromRow` row structs
//! - PostgreSQL enums mirrored by `sqlx::Type` enums
//! - Transactions where a read and its write must not interleave

pub mod types;
pub mod catalog;
pub mod orders;
pub mod driver_logs;
pub mod invoices;
pub mod users;

pub use catalog::CatalogRepository;
pub use orders::OrderRepository;
pub use driver_logs::DriverLogRepository;
pub use invoices::InvoiceRepository;
pub use users::UserRepository;
