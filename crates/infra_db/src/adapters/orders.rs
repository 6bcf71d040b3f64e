//! PostgreSQL Order Adapter
//!
//! `update_order` runs the caller's mutation inside a transaction that holds
//! `SELECT ... FOR UPDATE` on the order row, so the price written is always
//! the one computed from the dates and status written with it.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, OrderId, PortError};
use domain_rental::{Order, OrderMutation, OrderPort, OrderQuery};

use crate::repositories::orders::LockedUpdateError;
use crate::repositories::OrderRepository;

/// PostgreSQL-backed implementation of the OrderPort trait
#[derive(Debug, Clone)]
pub struct PostgresOrderAdapter {
    repository: OrderRepository,
    pool: PgPool,
}

impl PostgresOrderAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: OrderRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresOrderAdapter {}

#[async_trait]
impl HealthCheckable for PostgresOrderAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-order-adapter").await
    }
}

#[async_trait]
impl OrderPort for PostgresOrderAdapter {
    #[instrument(skip(self), fields(order_id = %id))]
    async fn get_order(&self, id: OrderId) -> Result<Order, PortError> {
        Ok(self.repository.get(id).await?)
    }

    #[instrument(skip(self))]
    async fn list_orders(&self, query: OrderQuery) -> Result<Vec<Order>, PortError> {
        let orders = self.repository.list(&query).await?;
        debug!(count = orders.len(), "Listed orders");
        Ok(orders)
    }

    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn insert_order(&self, order: Order) -> Result<Order, PortError> {
        self.repository.insert(&order).await?;
        Ok(order)
    }

    #[instrument(skip(self, mutation), fields(order_id = %id))]
    async fn update_order(&self, id: OrderId, mutation: OrderMutation) -> Result<Order, PortError> {
        match self.repository.update_locked(id, mutation).await {
            Ok(order) => {
                debug!(status = %order.status, price = %order.price, "Order written");
                Ok(order)
            }
            Err(LockedUpdateError::Database(e)) => Err(e.into()),
            Err(LockedUpdateError::Rejected(e)) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: OrderId) -> Result<(), PortError> {
        Ok(self.repository.delete(id).await?)
    }
}
