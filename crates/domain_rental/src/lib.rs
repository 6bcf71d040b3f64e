//! Rental Domain
//!
//! Equipment rental orders and how they are priced.
//!
//! # Pricing
//!
//! An order is priced once it is completed, from the elapsed days between
//! its pending and completed dates:
//!
//! | elapsed days      | base price                                   |
//! |-------------------|----------------------------------------------|
//! | `<= 2.5`          | `daily * days`                               |
//! | `<= 17.5`         | `weekly * days / 7`                          |
//! | `> 17.5`          | `monthly * days / 30`, else `weekly * days / 7` |
//!
//! Driver jobs multiply the base price by 1.2 and the equipment's total cost,
//! when set, caps the result. Prices are rounded to cents.
//!
//! Orders that are not completed carry a price of zero. The price is
//! computed whenever the order is written, so a stored order always agrees
//! with its status and dates.

pub mod pricing;
pub mod order;
pub mod error;
pub mod ports;
pub mod service;

pub use pricing::{
    OrderPriceEngine, OrderPricingInput, OrderQuote, PricingTier, role_multiplier, select_tier,
    DAILY_TIER_MAX_DAYS, WEEKLY_TIER_MAX_DAYS,
};
pub use order::{Order, OrderDraft, OrderStatus};
pub use error::RentalError;
pub use ports::{OrderMutation, OrderPort, OrderQuery};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockOrderPort;
pub use service::OrderService;
