//! Column types shared by the repositories

use std::str::FromStr;

use rust_decimal::Decimal;

use core_kernel::{Currency, Money};
use domain_catalog::BillingUnit;
use domain_rental::OrderStatus;

use crate::error::DatabaseError;

/// Mirrors the `order_status` PostgreSQL enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
pub enum DbOrderStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl From<OrderStatus> for DbOrderStatus {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => DbOrderStatus::Pending,
            OrderStatus::Active => DbOrderStatus::Active,
            OrderStatus::Completed => DbOrderStatus::Completed,
            OrderStatus::Cancelled => DbOrderStatus::Cancelled,
        }
    }
}

impl From<DbOrderStatus> for OrderStatus {
    fn from(status: DbOrderStatus) -> Self {
        match status {
            DbOrderStatus::Pending => OrderStatus::Pending,
            DbOrderStatus::Active => OrderStatus::Active,
            DbOrderStatus::Completed => OrderStatus::Completed,
            DbOrderStatus::Cancelled => OrderStatus::Cancelled,
        }
    }
}

/// Mirrors the `billing_unit` PostgreSQL enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "billing_unit", rename_all = "snake_case")]
pub enum DbBillingUnit {
    Bag,
    Gallon,
    Hour,
    Trip,
    Day,
}

impl From<BillingUnit> for DbBillingUnit {
    fn from(unit: BillingUnit) -> Self {
        match unit {
            BillingUnit::Bag => DbBillingUnit::Bag,
            BillingUnit::Gallon => DbBillingUnit::Gallon,
            BillingUnit::Hour => DbBillingUnit::Hour,
            BillingUnit::Trip => DbBillingUnit::Trip,
            BillingUnit::Day => DbBillingUnit::Day,
        }
    }
}

impl From<DbBillingUnit> for BillingUnit {
    fn from(unit: DbBillingUnit) -> Self {
        match unit {
            DbBillingUnit::Bag => BillingUnit::Bag,
            DbBillingUnit::Gallon => BillingUnit::Gallon,
            DbBillingUnit::Hour => BillingUnit::Hour,
            DbBillingUnit::Trip => BillingUnit::Trip,
            DbBillingUnit::Day => BillingUnit::Day,
        }
    }
}

/// Rebuilds a money value from its amount and currency columns
pub fn money(amount: Decimal, currency: &str) -> Result<Money, DatabaseError> {
    let currency = Currency::from_str(currency).map_err(|e| DatabaseError::decode("currency", e))?;
    Ok(Money::new(amount, currency))
}
