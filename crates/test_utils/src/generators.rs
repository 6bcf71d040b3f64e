//! Property-Based Test Generators
//!
//! Proptest strategies for rate cards, rental spans and log quantities.
//! Generated values always satisfy the catalog's validation rules.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::{Currency, ElapsedSpan};
use domain_catalog::{BillingUnit, EquipmentPrices, JobRoles};

pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::CAD),
        Just(Currency::MXN),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::AUD),
    ]
}

/// Non-negative rate with cents, up to 10,000
pub fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strictly positive rate with cents
pub fn positive_rate_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rental length in whole days, spanning every tier
pub fn rental_days_strategy() -> impl Strategy<Value = i64> {
    0i64..400i64
}

/// Equipment rates, with and without a monthly rate and cost cap
pub fn equipment_prices_strategy() -> impl Strategy<Value = EquipmentPrices> {
    (
        rate_strategy(),
        rate_strategy(),
        proptest::option::of(rate_strategy()),
        proptest::option::of(positive_rate_strategy()),
    )
        .prop_map(|(daily, weekly, monthly, total_cost)| {
            let mut prices = EquipmentPrices::new(daily, weekly);
            if let Some(monthly) = monthly {
                prices = prices.with_monthly(monthly);
            }
            if let Some(total_cost) = total_cost {
                prices = prices.with_total_cost(total_cost);
            }
            prices
        })
}

pub fn job_roles_strategy() -> impl Strategy<Value = JobRoles> {
    (any::<bool>(), any::<bool>()).prop_map(|(is_driver, is_equipment_man)| JobRoles {
        is_driver,
        is_equipment_man,
    })
}

pub fn billing_unit_strategy() -> impl Strategy<Value = BillingUnit> {
    prop_oneof![
        Just(BillingUnit::Bag),
        Just(BillingUnit::Gallon),
        Just(BillingUnit::Hour),
        Just(BillingUnit::Trip),
        Just(BillingUnit::Day),
    ]
}

/// Quantity as a driver would type it, with up to two decimals
pub fn quantity_text_strategy() -> impl Strategy<Value = String> {
    (0i64..100_000i64).prop_map(|hundredths| Decimal::new(hundredths, 2).to_string())
}

/// Instant between 2020 and 2030
pub fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (1_577_836_800i64..1_893_456_000i64)
        .prop_map(|secs| Utc.timestamp_opt(secs, 0).single().unwrap_or_else(Utc::now))
}

/// Span of up to a year at millisecond resolution, start before end
pub fn forward_span_strategy() -> impl Strategy<Value = ElapsedSpan> {
    (instant_strategy(), 0i64..31_536_000_000i64)
        .prop_map(|(start, millis)| ElapsedSpan::new(start, start + Duration::milliseconds(millis)))
}

/// Span whose end may precede its start
pub fn any_span_strategy() -> impl Strategy<Value = ElapsedSpan> {
    (instant_strategy(), -31_536_000_000i64..31_536_000_000i64)
        .prop_map(|(start, millis)| ElapsedSpan::new(start, start + Duration::milliseconds(millis)))
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_generated_prices_are_valid(prices in equipment_prices_strategy()) {
            prop_assert!(prices.validate().is_ok());
        }

        #[test]
        fn test_forward_spans_are_not_negative(span in forward_span_strategy()) {
            prop_assert!(!span.is_negative());
        }

        #[test]
        fn test_quantity_text_parses(text in quantity_text_strategy()) {
            prop_assert!(text.parse::<Decimal>().is_ok());
        }
    }
}
