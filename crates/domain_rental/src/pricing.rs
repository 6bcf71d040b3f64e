//! Tiered rental pricing
//!
//! The engine is total: missing equipment, job or dates price to zero rather
//! than failing, and a completed date before the pending date is treated as
//! zero elapsed days. A base price too large to compute is billed at the
//! equipment's cap, or at zero when it has none.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{Currency, ElapsedSpan, Money, Multiplier, TimeUnit};
use domain_catalog::{EquipmentPrices, JobRoles};

/// Longest rental billed at the daily rate
pub const DAILY_TIER_MAX_DAYS: Decimal = dec!(2.5);

/// Longest rental billed at the weekly rate when a monthly rate exists
pub const WEEKLY_TIER_MAX_DAYS: Decimal = dec!(17.5);

const DAYS_PER_WEEK: Decimal = dec!(7);
const DAYS_PER_MONTH: Decimal = dec!(30);

/// Surcharge applied to jobs that include driving
const DRIVER_SURCHARGE: Decimal = dec!(1.2);

/// Which rate a rental duration is billed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingTier {
    Daily,
    Weekly,
    Monthly,
    /// Monthly-length rental on equipment without a monthly rate
    WeeklyFallback,
}

impl PricingTier {
    /// Base price for `days` at this tier, or `None` on overflow
    pub fn base_price(&self, days: Decimal, prices: &EquipmentPrices) -> Option<Decimal> {
        let weekly = || prices.weekly.checked_mul(days / DAYS_PER_WEEK);
        match self {
            PricingTier::Daily => prices.daily.checked_mul(days),
            PricingTier::Weekly | PricingTier::WeeklyFallback => weekly(),
            PricingTier::Monthly => match prices.monthly_rate() {
                Some(monthly) => monthly.checked_mul(days / DAYS_PER_MONTH),
                None => weekly(),
            },
        }
    }
}

/// Picks the tier for an elapsed duration; both thresholds are inclusive
pub fn select_tier(days: Decimal, prices: &EquipmentPrices) -> PricingTier {
    if days <= DAILY_TIER_MAX_DAYS {
        PricingTier::Daily
    } else if days <= WEEKLY_TIER_MAX_DAYS {
        PricingTier::Weekly
    } else if prices.monthly_rate().is_some() {
        PricingTier::Monthly
    } else {
        PricingTier::WeeklyFallback
    }
}

/// The price multiplier a job's roles carry
pub fn role_multiplier(roles: &JobRoles) -> Multiplier {
    if roles.is_driver {
        Multiplier::new(DRIVER_SURCHARGE)
    } else {
        Multiplier::IDENTITY
    }
}

/// Everything an order price depends on
#[derive(Debug, Clone, Copy)]
pub struct OrderPricingInput<'a> {
    pub prices: Option<&'a EquipmentPrices>,
    pub roles: Option<&'a JobRoles>,
    pub pending_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
}

/// An explained order price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuote {
    /// `None` when an input was missing and the price is zero
    pub tier: Option<PricingTier>,
    pub duration_days: Decimal,
    /// `None` when the base price overflowed
    pub base_price: Option<Decimal>,
    pub multiplier: Multiplier,
    pub cap: Option<Decimal>,
    /// True when the cap lowered the price
    pub capped: bool,
    pub price: Money,
}

impl OrderQuote {
    fn zero(currency: Currency) -> Self {
        Self {
            tier: None,
            duration_days: Decimal::ZERO,
            base_price: Some(Decimal::ZERO),
            multiplier: Multiplier::IDENTITY,
            cap: None,
            capped: false,
            price: Money::zero(currency),
        }
    }
}

/// Computes rental order prices
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderPriceEngine {
    currency: Currency,
}

impl OrderPriceEngine {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Prices an order and reports how the price was reached
    pub fn quote(&self, input: &OrderPricingInput<'_>) -> OrderQuote {
        let (Some(prices), Some(roles), Some(span)) = (
            input.prices,
            input.roles,
            ElapsedSpan::from_optional(input.pending_date, input.completed_date),
        ) else {
            return OrderQuote::zero(self.currency);
        };

        let days = span.non_negative_in(TimeUnit::Days);
        let tier = select_tier(days, prices);
        let base_price = tier.base_price(days, prices);
        let multiplier = role_multiplier(roles);
        let adjusted = base_price.and_then(|base| multiplier.checked_apply(base));

        let cap = prices.cap();
        let (price, capped) = match (adjusted, cap) {
            (Some(adjusted), Some(cap)) => (
                Money::rounded(adjusted, self.currency).capped_at(cap),
                cap < adjusted,
            ),
            (Some(adjusted), None) => (Money::rounded(adjusted, self.currency), false),
            (None, Some(cap)) => (Money::rounded(cap, self.currency), true),
            (None, None) => {
                warn!(?tier, %days, "Order price overflowed with no cap, pricing at zero");
                (Money::zero(self.currency), false)
            }
        };

        OrderQuote {
            tier: Some(tier),
            duration_days: days,
            base_price,
            multiplier,
            cap,
            capped,
            price,
        }
    }

    pub fn price(&self, input: &OrderPricingInput<'_>) -> Money {
        self.quote(input).price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn prices() -> EquipmentPrices {
        EquipmentPrices::new(dec!(100), dec!(300)).with_monthly(dec!(900))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn quote_for(prices: &EquipmentPrices, roles: &JobRoles, hours: i64) -> OrderQuote {
        OrderPriceEngine::default().quote(&OrderPricingInput {
            prices: Some(prices),
            roles: Some(roles),
            pending_date: Some(t0()),
            completed_date: Some(t0() + Duration::hours(hours)),
        })
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        let p = prices();
        assert_eq!(select_tier(dec!(2.5), &p), PricingTier::Daily);
        assert_eq!(select_tier(dec!(2.5000001), &p), PricingTier::Weekly);
        assert_eq!(select_tier(dec!(17.5), &p), PricingTier::Weekly);
        assert_eq!(select_tier(dec!(17.5000001), &p), PricingTier::Monthly);
    }

    #[test]
    fn test_daily_tier() {
        let quote = quote_for(&prices(), &JobRoles::default(), 36);
        assert_eq!(quote.tier, Some(PricingTier::Daily));
        assert_eq!(quote.price.amount(), dec!(150.00));
    }

    #[test]
    fn test_weekly_tier() {
        // 14 days at 300/week
        let quote = quote_for(&prices(), &JobRoles::default(), 14 * 24);
        assert_eq!(quote.tier, Some(PricingTier::Weekly));
        assert_eq!(quote.price.amount(), dec!(600.00));
    }

    #[test]
    fn test_monthly_tier() {
        // 45 days at 900/month
        let quote = quote_for(&prices(), &JobRoles::default(), 45 * 24);
        assert_eq!(quote.tier, Some(PricingTier::Monthly));
        assert_eq!(quote.price.amount(), dec!(1350.00));
    }

    #[test]
    fn test_monthly_falls_back_to_weekly() {
        let p = EquipmentPrices::new(dec!(100), dec!(300));
        let quote = quote_for(&p, &JobRoles::default(), 40 * 24);
        assert_eq!(quote.tier, Some(PricingTier::WeeklyFallback));
        assert_eq!(quote.price.amount(), dec!(1714.29));
    }

    #[test]
    fn test_driver_surcharge_then_cap() {
        let p = prices().with_total_cost(dec!(160));
        let quote = quote_for(&p, &JobRoles::driver(), 36);
        assert_eq!(quote.base_price, Some(dec!(150)));
        assert_eq!(quote.multiplier.as_decimal(), dec!(1.2));
        assert!(quote.capped);
        assert_eq!(quote.price.amount(), dec!(160.00));
    }

    #[test]
    fn test_cap_below_a_cent_rounds_like_a_price() {
        let p = prices().with_total_cost(dec!(149.996));
        let quote = quote_for(&p, &JobRoles::default(), 36);
        assert!(quote.capped);
        assert_eq!(quote.price.amount(), dec!(150.00));
    }

    #[test]
    fn test_overflowing_rate_bills_the_cap() {
        let p = EquipmentPrices::new(Decimal::MAX, Decimal::MAX).with_total_cost(dec!(5000));
        let quote = quote_for(&p, &JobRoles::driver(), 48);
        assert_eq!(quote.base_price, None);
        assert!(quote.capped);
        assert_eq!(quote.price.amount(), dec!(5000.00));
    }

    #[test]
    fn test_overflowing_surcharge_without_cap_is_zero() {
        // the base fits, the 1.2 surcharge does not
        let p = EquipmentPrices::new(Decimal::MAX, Decimal::MAX);
        let quote = quote_for(&p, &JobRoles::driver(), 24);
        assert_eq!(quote.base_price, Some(Decimal::MAX));
        assert!(!quote.capped);
        assert!(quote.price.is_zero());
    }

    #[test]
    fn test_missing_date_is_zero() {
        let p = prices();
        let roles = JobRoles::default();
        let quote = OrderPriceEngine::default().quote(&OrderPricingInput {
            prices: Some(&p),
            roles: Some(&roles),
            pending_date: Some(t0()),
            completed_date: None,
        });
        assert_eq!(quote.tier, None);
        assert!(quote.price.is_zero());
    }

    #[test]
    fn test_negative_duration_prices_to_zero() {
        let quote = quote_for(&prices(), &JobRoles::driver(), -48);
        assert_eq!(quote.duration_days, Decimal::ZERO);
        assert!(quote.price.is_zero());
    }
}
