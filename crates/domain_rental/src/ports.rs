//! Rental Domain Ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, HealthCheckable, OrderId, PortError, UserId};

use crate::order::{Order, OrderStatus};

/// Query parameters for listing orders
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub user_id: Option<UserId>,
    pub status: Option<OrderStatus>,
    /// Inclusive lower bound on `start_date`
    pub start_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `start_date`
    pub start_to: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl OrderQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.user_id.map_or(true, |user| order.user_id == user)
            && self.status.map_or(true, |status| order.status == status)
            && self.start_from.map_or(true, |from| order.start_date >= from)
            && self.start_to.map_or(true, |to| order.start_date <= to)
    }
}

/// A change applied to a stored order while it is locked
pub type OrderMutation = Box<dyn FnOnce(&mut Order) -> Result<(), PortError> + Send>;

/// Port for order persistence
#[async_trait]
pub trait OrderPort: DomainPort + HealthCheckable {
    async fn get_order(&self, id: OrderId) -> Result<Order, PortError>;

    /// Orders matching `query`, newest start date first
    async fn list_orders(&self, query: OrderQuery) -> Result<Vec<Order>, PortError>;

    /// Inserts a new order
    async fn insert_order(&self, order: Order) -> Result<Order, PortError>;

    /// Loads, mutates and writes back an order as one atomic step
    ///
    /// Concurrent updates to the same order are serialized, so the price
    /// written always matches the dates and status it was computed from.
    async fn update_order(&self, id: OrderId, mutation: OrderMutation) -> Result<Order, PortError>;

    async fn delete_order(&self, id: OrderId) -> Result<(), PortError>;
}

/// Mock implementation of OrderPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    #[derive(Debug, Default, Clone)]
    pub struct MockOrderPort {
        orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    }

    impl MockOrderPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn len(&self) -> usize {
            self.orders.read().await.len()
        }
    }

    impl DomainPort for MockOrderPort {}

    #[async_trait]
    impl HealthCheckable for MockOrderPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-order-port")
        }
    }

    #[async_trait]
    impl OrderPort for MockOrderPort {
        async fn get_order(&self, id: OrderId) -> Result<Order, PortError> {
            self.orders
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Order", id))
        }

        async fn list_orders(&self, query: OrderQuery) -> Result<Vec<Order>, PortError> {
            let mut results: Vec<Order> = self
                .orders
                .read()
                .await
                .values()
                .filter(|order| query.matches(order))
                .cloned()
                .collect();
            results.sort_by(|a, b| b.start_date.cmp(&a.start_date));

            let offset = query.offset.unwrap_or(0) as usize;
            let limit = query.limit.map_or(usize::MAX, |l| l as usize);
            Ok(results.into_iter().skip(offset).take(limit).collect())
        }

        async fn insert_order(&self, order: Order) -> Result<Order, PortError> {
            let mut orders = self.orders.write().await;
            if orders.contains_key(&order.id) {
                return Err(PortError::conflict(format!("Order {} already exists", order.id)));
            }
            orders.insert(order.id, order.clone());
            Ok(order)
        }

        async fn update_order(&self, id: OrderId, mutation: OrderMutation) -> Result<Order, PortError> {
            // Holding the write guard for the whole mutation mirrors a row lock
            let mut orders = self.orders.write().await;
            let stored = orders.get(&id).ok_or_else(|| PortError::not_found("Order", id))?;
            let mut updated = stored.clone();
            mutation(&mut updated)?;
            orders.insert(id, updated.clone());
            Ok(updated)
        }

        async fn delete_order(&self, id: OrderId) -> Result<(), PortError> {
            self.orders
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Order", id))
        }
    }
}
