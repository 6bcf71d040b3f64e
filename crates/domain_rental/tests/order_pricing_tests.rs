//! Pricing properties of rental orders

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{Currency, Money};
use domain_catalog::{EquipmentPrices, JobRoles};
use domain_rental::{OrderPriceEngine, OrderPricingInput, PricingTier};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::assertions::{assert_money_not_negative, assert_within_cap};
use test_utils::generators::{
    currency_strategy, equipment_prices_strategy, job_roles_strategy, rental_days_strategy,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
}

fn price(prices: &EquipmentPrices, roles: &JobRoles, elapsed: Duration) -> Decimal {
    OrderPriceEngine::default()
        .price(&OrderPricingInput {
            prices: Some(prices),
            roles: Some(roles),
            pending_date: Some(t0()),
            completed_date: Some(t0() + elapsed),
        })
        .amount()
}

mod tier_table {
    use super::*;

    fn card() -> EquipmentPrices {
        EquipmentPrices::new(dec!(80), dec!(350))
            .with_monthly(dec!(1100))
            .with_total_cost(dec!(2500))
    }

    #[test]
    fn test_zero_days() {
        assert_eq!(price(&card(), &JobRoles::default(), Duration::zero()), dec!(0));
    }

    #[test]
    fn test_exactly_two_and_a_half_days_is_daily() {
        assert_eq!(price(&card(), &JobRoles::default(), Duration::hours(60)), dec!(200.00));
    }

    #[test]
    fn test_just_over_two_and_a_half_days_is_weekly() {
        // 350 * (2.5 days + 1ms) / 7
        let p = price(&card(), &JobRoles::default(), Duration::hours(60) + Duration::milliseconds(1));
        assert_eq!(p, dec!(125.00));
    }

    #[test]
    fn test_exactly_seventeen_and_a_half_days_is_weekly() {
        assert_eq!(price(&card(), &JobRoles::default(), Duration::hours(420)), dec!(875.00));
    }

    #[test]
    fn test_just_over_seventeen_and_a_half_days_is_monthly() {
        let p = price(&card(), &JobRoles::default(), Duration::hours(420) + Duration::milliseconds(1));
        // 1100 * 17.5 / 30
        assert_eq!(p, dec!(641.67));
    }

    #[test]
    fn test_sixty_days_is_clamped() {
        // 1100 * 2 = 2200 * 1.2 = 2640 > 2500
        assert_eq!(price(&card(), &JobRoles::driver(), Duration::days(60)), dec!(2500.00));
        assert_eq!(price(&card(), &JobRoles::default(), Duration::days(60)), dec!(2200.00));
    }

    #[test]
    fn test_forty_days_without_monthly_uses_weekly() {
        let card = EquipmentPrices::new(dec!(80), dec!(350));
        let quote = OrderPriceEngine::default().quote(&OrderPricingInput {
            prices: Some(&card),
            roles: Some(&JobRoles::default()),
            pending_date: Some(t0()),
            completed_date: Some(t0() + Duration::days(40)),
        });
        assert_eq!(quote.tier, Some(PricingTier::WeeklyFallback));
        assert_eq!(quote.price.amount(), dec!(2000.00));
    }

    #[test]
    fn test_missing_equipment_or_job_is_zero() {
        let engine = OrderPriceEngine::default();
        let card = card();
        let no_equipment = engine.price(&OrderPricingInput {
            prices: None,
            roles: Some(&JobRoles::driver()),
            pending_date: Some(t0()),
            completed_date: Some(t0() + Duration::days(3)),
        });
        let no_job = engine.price(&OrderPricingInput {
            prices: Some(&card),
            roles: None,
            pending_date: Some(t0()),
            completed_date: Some(t0() + Duration::days(3)),
        });
        assert!(no_equipment.is_zero());
        assert!(no_job.is_zero());
    }
}

proptest! {
    #[test]
    fn price_never_exceeds_cap(
        card in equipment_prices_strategy(),
        days in rental_days_strategy(),
        roles in job_roles_strategy(),
        currency in currency_strategy(),
    ) {
        let price = OrderPriceEngine::new(currency).price(&OrderPricingInput {
            prices: Some(&card),
            roles: Some(&roles),
            pending_date: Some(t0()),
            completed_date: Some(t0() + Duration::days(days)),
        });
        prop_assert_eq!(price.currency(), currency);
        assert_money_not_negative(&price);
        assert_within_cap(&price, card.cap());
    }

    #[test]
    fn uncapped_driver_price_is_base_times_one_point_two(
        card in equipment_prices_strategy(),
        minutes in 0i64..(120 * 24 * 60),
    ) {
        let uncapped = EquipmentPrices { total_cost: None, ..card };
        let engine = OrderPriceEngine::default();
        let plain_roles = JobRoles::default();
        let driver_roles = JobRoles::driver();
        let input = |roles| OrderPricingInput {
            prices: Some(&uncapped),
            roles: Some(roles),
            pending_date: Some(t0()),
            completed_date: Some(t0() + Duration::minutes(minutes)),
        };
        let plain = engine.quote(&input(&plain_roles));
        let driver = engine.quote(&input(&driver_roles));

        let base = plain.base_price.unwrap();
        prop_assert_eq!(driver.base_price, Some(base));
        prop_assert!(!driver.capped);
        prop_assert_eq!(driver.price, Money::rounded(base * dec!(1.2), Currency::USD));
    }

    #[test]
    fn same_inputs_same_price(card in equipment_prices_strategy(), minutes in 0i64..(120 * 24 * 60)) {
        let roles = JobRoles::driver();
        let first = price(&card, &roles, Duration::minutes(minutes));
        let second = price(&card, &roles, Duration::minutes(minutes));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn missing_date_is_always_zero(card in equipment_prices_strategy(), pending in any::<bool>()) {
        let engine = OrderPriceEngine::default();
        let roles = JobRoles::driver();
        let input = OrderPricingInput {
            prices: Some(&card),
            roles: Some(&roles),
            pending_date: pending.then(t0),
            completed_date: (!pending).then(|| t0() + Duration::days(5)),
        };
        prop_assert!(engine.price(&input).is_zero());
    }
}
