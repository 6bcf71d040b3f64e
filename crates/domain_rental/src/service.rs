//! Order application service
//!
//! Loads the equipment and job an order refers to, applies the change and
//! persists it with the freshly computed price in one port call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use tracing::{info, instrument};

use core_kernel::{EquipmentId, JobId, OrderId, PortError, Timezone, UserId};
use domain_catalog::{CatalogPort, Equipment, Job, JobFilter};

use crate::error::RentalError;
use crate::order::{Order, OrderDraft, OrderStatus};
use crate::ports::{OrderMutation, OrderPort, OrderQuery};
use crate::pricing::{OrderPriceEngine, OrderPricingInput, OrderQuote};

pub struct OrderService {
    orders: Arc<dyn OrderPort>,
    catalog: Arc<dyn CatalogPort>,
    engine: OrderPriceEngine,
    timezone: Timezone,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderPort>, catalog: Arc<dyn CatalogPort>, engine: OrderPriceEngine) -> Self {
        Self {
            orders,
            catalog,
            engine,
            timezone: Timezone::default(),
        }
    }

    /// Sets the timezone whose calendar day bounds order start dates
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Jobs that may be attached to a new order
    pub async fn orderable_jobs(&self) -> Result<Vec<Job>, RentalError> {
        self.catalog
            .list_jobs(JobFilter::for_orders())
            .await
            .map_err(|e| RentalError::from_port("load jobs", e))
    }

    /// Prices a hypothetical order without storing anything
    ///
    /// Missing ids or dates yield a zero quote; ids that do not resolve are
    /// reported as not found.
    #[instrument(skip(self))]
    pub async fn quote(
        &self,
        equipment_id: Option<EquipmentId>,
        job_id: Option<JobId>,
        pending_date: Option<DateTime<Utc>>,
        completed_date: Option<DateTime<Utc>>,
    ) -> Result<OrderQuote, RentalError> {
        let equipment = match equipment_id {
            Some(id) => Some(self.load_equipment(id).await?),
            None => None,
        };
        let job = match job_id {
            Some(id) => Some(self.load_job(id).await?),
            None => None,
        };

        Ok(self.engine.quote(&OrderPricingInput {
            prices: equipment.as_ref().map(|e| &e.prices),
            roles: job.as_ref().map(|j| &j.roles),
            pending_date,
            completed_date,
        }))
    }

    #[instrument(skip(self, draft), fields(client = %draft.client_name))]
    pub async fn create(&self, user_id: UserId, draft: OrderDraft) -> Result<Order, RentalError> {
        draft.ensure_complete()?;
        let (equipment, job) = self.load_refs(&draft).await?;

        let now = Utc::now();
        let today = now.with_timezone(&self.timezone.0).date_naive();
        let (earliest_start, _) = self
            .timezone
            .day_bounds(today)
            .map_err(|e| RentalError::Validation(e.to_string()))?;

        let order = Order::create(user_id, draft, &equipment, &job, &self.engine, now, earliest_start)?;
        let order = self
            .orders
            .insert_order(order)
            .await
            .map_err(|e| RentalError::from_port("save order", e))?;

        info!(order_id = %order.id, status = %order.status, "Order created");
        Ok(order)
    }

    /// Replaces an order's editable fields and reprices it
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: OrderId, draft: OrderDraft) -> Result<Order, RentalError> {
        draft.ensure_complete()?;
        let (equipment, job) = self.load_refs(&draft).await?;
        let engine = self.engine;
        let now = Utc::now();

        let order = self
            .mutate(id, "save order", move |order| {
                order.apply(draft, &equipment, &job, &engine, now)
            })
            .await?;

        info!(order_id = %order.id, status = %order.status, price = %order.price, "Order updated");
        Ok(order)
    }

    /// Moves an order to `status`, pricing it if it becomes completed
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, RentalError> {
        let current = self.get(id).await?;
        let equipment = self.load_equipment(current.equipment_id).await?;
        let job = self.load_job(current.job_id).await?;
        let engine = self.engine;
        let now = Utc::now();

        let order = self
            .mutate(id, "update order status", move |order| {
                order.transition(status, &equipment, &job, &engine, now)
            })
            .await?;

        info!(order_id = %order.id, status = %order.status, price = %order.price, "Order status changed");
        Ok(order)
    }

    pub async fn get(&self, id: OrderId) -> Result<Order, RentalError> {
        self.orders
            .get_order(id)
            .await
            .map_err(|e| RentalError::from_port("load order", e))
    }

    pub async fn list(&self, query: OrderQuery) -> Result<Vec<Order>, RentalError> {
        self.orders
            .list_orders(query)
            .await
            .map_err(|e| RentalError::from_port("load orders", e))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<(), RentalError> {
        self.orders
            .delete_order(id)
            .await
            .map_err(|e| RentalError::from_port("delete order", e))?;
        info!(order_id = %id, "Order deleted");
        Ok(())
    }

    /// Applies `step` to a stored order through the port
    ///
    /// A rejection from `step` reaches the caller as the original
    /// `RentalError`; only storage failures are wrapped with `operation`.
    async fn mutate<F>(&self, id: OrderId, operation: &'static str, step: F) -> Result<Order, RentalError>
    where
        F: FnOnce(&mut Order) -> Result<(), RentalError> + Send + 'static,
    {
        let (rejected_tx, mut rejected) = oneshot::channel();
        let mutation: OrderMutation = Box::new(move |order: &mut Order| {
            step(order).map_err(|error| {
                let port_error = PortError::validation(error.to_string());
                let _ = rejected_tx.send(error);
                port_error
            })
        });

        match self.orders.update_order(id, mutation).await {
            Ok(order) => Ok(order),
            Err(e) => Err(rejected
                .try_recv()
                .unwrap_or_else(|_| RentalError::from_port(operation, e))),
        }
    }

    async fn load_refs(&self, draft: &OrderDraft) -> Result<(Equipment, Job), RentalError> {
        let equipment_id = draft
            .equipment_id
            .ok_or_else(|| RentalError::MissingFields(vec!["equipment_id"]))?;
        let job_id = draft
            .job_id
            .ok_or_else(|| RentalError::MissingFields(vec!["job_id"]))?;
        Ok((self.load_equipment(equipment_id).await?, self.load_job(job_id).await?))
    }

    async fn load_equipment(&self, id: EquipmentId) -> Result<Equipment, RentalError> {
        self.catalog
            .get_equipment(id)
            .await
            .map_err(|e| RentalError::from_port("load equipment", e))
    }

    async fn load_job(&self, id: JobId) -> Result<Job, RentalError> {
        self.catalog
            .get_job(id)
            .await
            .map_err(|e| RentalError::from_port("load job", e))
    }
}
