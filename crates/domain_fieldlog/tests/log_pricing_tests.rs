//! Pricing properties of driver log entries

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{Currency, Money};
use domain_catalog::{ActionPrices, BillingUnit};
use domain_fieldlog::{parse_quantity, LogPriceEngine, LogPricingInput};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::assertions::assert_money_not_negative;
use test_utils::generators::{
    any_span_strategy, billing_unit_strategy, forward_span_strategy, quantity_text_strategy, rate_strategy,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 9, 6, 0, 0).unwrap()
}

#[test]
fn test_reference_prices() {
    let engine = LogPriceEngine::default();
    let prices = ActionPrices::new()
        .with(BillingUnit::Bag, dec!(5))
        .with(BillingUnit::Trip, dec!(20))
        .with(BillingUnit::Hour, dec!(10));

    let bags = engine.price(&LogPricingInput {
        prices: Some(&prices),
        unit: Some(BillingUnit::Bag),
        quantity: Some(parse_quantity("3")),
        ..Default::default()
    });
    let trip = engine.price(&LogPricingInput {
        prices: Some(&prices),
        unit: Some(BillingUnit::Trip),
        ..Default::default()
    });
    let hours = engine.price(&LogPricingInput {
        prices: Some(&prices),
        unit: Some(BillingUnit::Hour),
        start_time: Some(t0()),
        end_time: Some(t0() + Duration::minutes(150)),
        ..Default::default()
    });

    assert_eq!(bags.amount(), dec!(15.00));
    assert_eq!(trip.amount(), dec!(20.00));
    assert_eq!(hours.amount(), dec!(25.00));
}

#[test]
fn test_blank_rate_from_stored_document_prices_to_zero() {
    let prices: ActionPrices = serde_json::from_str(r#"{"bag": "", "trip": 20}"#).unwrap();
    let price = LogPriceEngine::default().price(&LogPricingInput {
        prices: Some(&prices),
        unit: Some(BillingUnit::Bag),
        quantity: Some(dec!(10)),
        ..Default::default()
    });
    assert!(price.is_zero());
}

proptest! {
    #[test]
    fn price_is_never_negative(
        unit in billing_unit_strategy(),
        rate in rate_strategy(),
        quantity in -1_000i64..1_000i64,
        span in any_span_strategy(),
    ) {
        let prices = ActionPrices::new().with(unit, rate);
        let price = LogPriceEngine::default().price(&LogPricingInput {
            prices: Some(&prices),
            unit: Some(unit),
            quantity: Some(Decimal::from(quantity)),
            start_time: Some(span.start),
            end_time: Some(span.end),
        });
        assert_money_not_negative(&price);
    }

    #[test]
    fn hourly_price_follows_elapsed_hours(rate in rate_strategy(), span in forward_span_strategy()) {
        let prices = ActionPrices::new().with(BillingUnit::Hour, rate);
        let price = LogPriceEngine::default().price(&LogPricingInput {
            prices: Some(&prices),
            unit: Some(BillingUnit::Hour),
            start_time: Some(span.start),
            end_time: Some(span.end),
            ..Default::default()
        });
        let hours = Decimal::from((span.end - span.start).num_milliseconds()) / dec!(3_600_000);
        prop_assert!((price.amount() - rate * hours).abs() <= dec!(0.005));
    }

    #[test]
    fn trip_is_flat(
        rate_cents in 1i64..100_000i64,
        quantity in any::<Option<u16>>(),
        minutes in any::<Option<u16>>(),
    ) {
        let prices = ActionPrices::new().with(BillingUnit::Trip, Decimal::new(rate_cents, 2));
        let price = LogPriceEngine::default().price(&LogPricingInput {
            prices: Some(&prices),
            unit: Some(BillingUnit::Trip),
            quantity: quantity.map(Decimal::from),
            start_time: minutes.map(|_| t0()),
            end_time: minutes.map(|m| t0() + Duration::minutes(i64::from(m))),
        });
        prop_assert_eq!(price.amount(), Decimal::new(rate_cents, 2));
    }

    #[test]
    fn typed_quantity_scales_the_rate(rate_cents in 1i64..10_000i64, text in quantity_text_strategy()) {
        let rate = Decimal::new(rate_cents, 2);
        let prices = ActionPrices::new().with(BillingUnit::Gallon, rate);
        let quantity = parse_quantity(&text);
        let price = LogPriceEngine::default().price(&LogPricingInput {
            prices: Some(&prices),
            unit: Some(BillingUnit::Gallon),
            quantity: Some(quantity),
            ..Default::default()
        });
        prop_assert_eq!(quantity, text.parse::<Decimal>().unwrap());
        prop_assert_eq!(price, Money::rounded(rate * quantity, Currency::USD));
    }
}
