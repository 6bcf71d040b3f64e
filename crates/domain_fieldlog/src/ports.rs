//! Field Log Domain Ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, DriverLogId, HealthCheckable, PortError, UserId};

use crate::log::DriverLog;

/// Query parameters for listing driver logs
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    pub driver_id: Option<UserId>,
    /// Inclusive lower bound on `created_at`
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`
    pub created_to: Option<DateTime<Utc>>,
}

impl LogQuery {
    pub fn for_driver(driver_id: UserId) -> Self {
        Self {
            driver_id: Some(driver_id),
            ..Default::default()
        }
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self.created_to = Some(to);
        self
    }

    pub fn matches(&self, log: &DriverLog) -> bool {
        self.driver_id.map_or(true, |driver| log.driver_id == driver)
            && self.created_from.map_or(true, |from| log.created_at >= from)
            && self.created_to.map_or(true, |to| log.created_at <= to)
    }
}

/// Port for driver log persistence
#[async_trait]
pub trait LogPort: DomainPort + HealthCheckable {
    async fn get_log(&self, id: DriverLogId) -> Result<DriverLog, PortError>;

    /// Logs matching `query`, newest first
    async fn list_logs(&self, query: LogQuery) -> Result<Vec<DriverLog>, PortError>;

    async fn insert_log(&self, log: DriverLog) -> Result<DriverLog, PortError>;

    /// Replaces a stored log; `NotFound` if it does not exist
    async fn update_log(&self, log: DriverLog) -> Result<DriverLog, PortError>;
}

/// Mock implementation of LogPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    #[derive(Debug, Default, Clone)]
    pub struct MockLogPort {
        logs: Arc<RwLock<HashMap<DriverLogId, DriverLog>>>,
        fail_writes: Arc<AtomicBool>,
    }

    impl MockLogPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes inserts and updates fail as if the database were down
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        fn check_writable(&self) -> Result<(), PortError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock log store is down"));
            }
            Ok(())
        }

        pub async fn with_log(self, log: DriverLog) -> Self {
            self.logs.write().await.insert(log.id, log);
            self
        }
    }

    impl DomainPort for MockLogPort {}

    #[async_trait]
    impl HealthCheckable for MockLogPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-log-port")
        }
    }

    #[async_trait]
    impl LogPort for MockLogPort {
        async fn get_log(&self, id: DriverLogId) -> Result<DriverLog, PortError> {
            self.logs
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("DriverLog", id))
        }

        async fn list_logs(&self, query: LogQuery) -> Result<Vec<DriverLog>, PortError> {
            let mut results: Vec<DriverLog> = self
                .logs
                .read()
                .await
                .values()
                .filter(|log| query.matches(log))
                .cloned()
                .collect();
            results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(results)
        }

        async fn insert_log(&self, log: DriverLog) -> Result<DriverLog, PortError> {
            self.check_writable()?;
            let mut logs = self.logs.write().await;
            if logs.contains_key(&log.id) {
                return Err(PortError::conflict(format!("DriverLog {} already exists", log.id)));
            }
            logs.insert(log.id, log.clone());
            Ok(log)
        }

        async fn update_log(&self, log: DriverLog) -> Result<DriverLog, PortError> {
            self.check_writable()?;
            let mut logs = self.logs.write().await;
            match logs.get_mut(&log.id) {
                Some(stored) => {
                    *stored = log.clone();
                    Ok(log)
                }
                None => Err(PortError::not_found("DriverLog", log.id)),
            }
        }
    }
}
