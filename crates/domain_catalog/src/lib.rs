//! Catalog Domain
//!
//! The reference data every price is computed from:
//!
//! - **Equipment**: rental inventory with a tiered rate card
//!   (daily / weekly / optional monthly) and an optional total-cost cap
//! - **Job**: a role template; `is_driver` adds the driver surcharge to
//!   rental orders, `is_equipment_man` makes the job selectable on orders
//! - **Action**: a billable field activity with a sparse per-unit price map
//! - **Contact**: the customer a driver log is recorded against
//! - **UserAccount**: a staff login with admin / driver / equipment-man flags
//!
//! Accessors here are pure reads. Missing or zero rates are reported as
//! `None` so the pricing engines can fall back or yield zero.

pub mod equipment;
pub mod job;
pub mod action;
pub mod contact;
pub mod user;
pub mod error;
pub mod ports;

pub use equipment::{Equipment, EquipmentPrices, image_storage_path, is_hosted_url};
pub use job::{Job, JobRoles};
pub use action::{Action, ActionPrices, BillingUnit};
pub use contact::Contact;
pub use user::{UserAccount, UserRoles, UserType};
pub use error::CatalogError;
pub use ports::{CatalogPort, JobFilter, UserPort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockCatalogPort, MockUserPort};
