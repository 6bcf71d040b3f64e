//! Core Kernel - Foundational types for the field operations services
//!
//! This crate provides the building blocks every domain crate uses:
//! - Money with precise decimal arithmetic and price multipliers
//! - Elapsed-duration calculation for tiered and per-unit pricing
//! - Typed identifiers for catalog and operations records
//! - Port contracts implemented by database, HTTP and mock adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Multiplier, MAX_AMOUNT};
pub use temporal::{
    DurationCalculator, ElapsedSpan, TimeUnit, Timezone, TemporalError,
    MILLIS_PER_DAY, MILLIS_PER_HOUR,
};
pub use identifiers::{
    EquipmentId, JobId, ActionId, ContactId, UserId, OrderId, DriverLogId,
};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
