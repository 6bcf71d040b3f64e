//! Pre-built Test Fixtures
//!
//! Catalog records and instants with fixed, predictable values. The rate
//! card mirrors a typical mid-size excavator rental.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};
use domain_catalog::{Action, ActionPrices, BillingUnit, Contact, Equipment, EquipmentPrices, Job, JobRoles};

pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn usd(amount: rust_decimal::Decimal) -> Money {
        Money::rounded(amount, Currency::USD)
    }

    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }
}

/// Fixed instants, so tier boundaries can be hit exactly
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// 2024-05-01 08:00 UTC
    pub fn pending() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    /// `days` after [`TemporalFixtures::pending`]
    pub fn days_after_pending(days: i64) -> DateTime<Utc> {
        Self::pending() + Duration::days(days)
    }

    /// `hours` and `minutes` after [`TemporalFixtures::pending`]
    pub fn shift_end(hours: i64, minutes: i64) -> DateTime<Utc> {
        Self::pending() + Duration::hours(hours) + Duration::minutes(minutes)
    }

    /// A start date that is always in the future
    pub fn tomorrow() -> DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }
}

pub struct CatalogFixtures;

impl CatalogFixtures {
    /// daily 300, weekly 1000, monthly 3000, capped at 2000
    pub fn excavator_prices() -> EquipmentPrices {
        EquipmentPrices::new(dec!(300), dec!(1000))
            .with_monthly(dec!(3000))
            .with_total_cost(dec!(2000))
    }

    pub fn excavator() -> Equipment {
        Equipment::new("Excavator 20t", "Tracked excavator", Self::excavator_prices())
    }

    /// daily 150, weekly 600, no monthly rate, no cap
    pub fn compactor() -> Equipment {
        Equipment::new("Plate compactor", "Walk-behind compactor", EquipmentPrices::new(dec!(150), dec!(600)))
    }

    pub fn operator_job() -> Job {
        Job::new("Operator", "Runs rented machines", JobRoles::equipment_man())
    }

    /// Equipment-man job that also drives, so orders carry the surcharge
    pub fn driving_operator_job() -> Job {
        Job::new(
            "Driving operator",
            "Delivers and runs machines",
            JobRoles {
                is_driver: true,
                is_equipment_man: true,
            },
        )
    }

    pub fn driver_job() -> Job {
        Job::new("Driver", "Hauls material", JobRoles::driver())
    }

    /// bag 5, hour 65, trip 20, day 400
    pub fn hauling_action() -> Action {
        Action::new(
            "Hauling",
            "Material hauling",
            ActionPrices::new()
                .with(BillingUnit::Bag, dec!(5))
                .with(BillingUnit::Hour, dec!(65))
                .with(BillingUnit::Trip, dec!(20))
                .with(BillingUnit::Day, dec!(400)),
        )
    }

    pub fn contact() -> Contact {
        Contact::new("Greenway Farms").with_email("office@greenway.example")
    }
}
