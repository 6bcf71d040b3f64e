//! Infrastructure Database Layer
//!
//! This crate provides PostgreSQL persistence for the field operations core
//! using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories own the SQL and
//! map rows to domain types; adapters implement the domain ports on top of
//! them and translate `DatabaseError` into `PortError`.
//!
//! Queries are built at runtime (`sqlx::query_as` with `FromRow` rows), so
//! the crate compiles without a live database.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::PostgresOrderAdapter;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/fieldops")).await?;
//! run_migrations(&pool).await?;
//! let orders = PostgresOrderAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, DatabaseConfig, create_pool, create_pool_from_url, run_migrations};
pub use error::DatabaseError;
pub use adapters::{PostgresCatalogAdapter, PostgresDriverLogAdapter, PostgresInvoiceAdapter, PostgresOrderAdapter, PostgresUserAdapter};
