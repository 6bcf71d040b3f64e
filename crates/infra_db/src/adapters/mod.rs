//! Domain Adapters
//!
//! PostgreSQL implementations of the domain ports. Each adapter:
//! - Implements one domain port trait
//! - Delegates SQL to its repository
//! - Translates `DatabaseError` into `PortError`
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresCatalogAdapter;
//! use domain_catalog::CatalogPort;
//!
//! let catalog: Arc<dyn CatalogPort> = Arc::new(PostgresCatalogAdapter::new(pool));
//! let equipment = catalog.get_equipment(id).await?;
//! ```

pub mod catalog;
pub mod orders;
pub mod driver_logs;
pub mod invoices;
pub mod users;

pub use catalog::PostgresCatalogAdapter;
pub use orders::PostgresOrderAdapter;
pub use driver_logs::PostgresDriverLogAdapter;
pub use invoices::PostgresInvoiceAdapter;
pub use users::PostgresUserAdapter;

use std::time::Instant;

use chrono::Utc;
use sqlx::PgPool;

use core_kernel::{AdapterHealth, HealthCheckResult};

/// Runs `SELECT 1` and reports the round trip
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();
    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (status, message) = match result {
        Ok(_) => (AdapterHealth::Healthy, None),
        Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
    };
    HealthCheckResult {
        adapter_id: adapter_id.to_string(),
        status,
        latency_ms,
        message,
        checked_at: Utc::now(),
    }
}
