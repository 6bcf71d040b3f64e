//! Per-unit pricing of driver log entries
//!
//! | unit            | price                         |
//! |-----------------|-------------------------------|
//! | bag, gallon     | `rate * quantity`             |
//! | trip            | `rate`                        |
//! | hour            | `rate * elapsed hours`        |
//! | day             | `rate * elapsed days`         |
//!
//! An unset or zero rate, a missing unit, or a missing quantity or time
//! prices to zero. There is no cap, and the result is never negative. A
//! product too large to compute also prices to zero; request validation
//! keeps stored quantities well inside that range.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{Currency, ElapsedSpan, Money, TimeUnit};
use domain_catalog::{ActionPrices, BillingUnit};

/// Everything a log entry's price depends on
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPricingInput<'a> {
    pub prices: Option<&'a ActionPrices>,
    pub unit: Option<BillingUnit>,
    pub quantity: Option<Decimal>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Elapsed time recorded on a time-based log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDuration {
    pub value: Decimal,
    pub unit: TimeUnit,
}

impl LogDuration {
    /// The billed duration of an entry, for hour and day units only
    pub fn for_entry(
        unit: BillingUnit,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        let time_unit = unit.time_unit()?;
        let span = ElapsedSpan::from_optional(start_time, end_time)?;
        Some(Self {
            value: span.non_negative_in(time_unit).round_dp(4),
            unit: time_unit,
        })
    }
}

/// Reads a quantity the way a hand-typed form value is read
///
/// The longest leading decimal number is used (`"3 bags"` is 3, `"1e3"` is
/// 1000); anything without one is zero. Numbers too large for a `Decimal`
/// saturate at `Decimal::MAX` so that validation can reject them.
pub fn parse_quantity(raw: &str) -> Decimal {
    let trimmed = raw.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_point = false;

    for (index, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if index == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => break,
        }
        end = index + ch.len_utf8();
    }

    if !seen_digit {
        return Decimal::ZERO;
    }
    let number = &trimmed[..end];
    let negative = number.starts_with('-');
    let digits = number.trim_start_matches(['+', '-']).trim_end_matches('.');
    let digits = if digits.starts_with('.') {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };

    let magnitude = Decimal::from_str(&digits)
        .ok()
        .and_then(|mantissa| scale_by_power_of_ten(mantissa, parse_exponent(&trimmed[end..])))
        .unwrap_or(Decimal::MAX);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Exponent suffix such as `e3` or `E-2`; zero when absent or incomplete
fn parse_exponent(rest: &str) -> i64 {
    let Some(rest) = rest.strip_prefix(['e', 'E']) else {
        return 0;
    };
    let (negative, rest) = match rest.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, rest.strip_prefix('+').unwrap_or(rest)),
    };
    let len = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    if len == 0 {
        return 0;
    }
    let value = rest[..len].parse::<i64>().unwrap_or(i64::MAX);
    if negative {
        -value
    } else {
        value
    }
}

/// `None` when the result overflows; tiny results round to zero
fn scale_by_power_of_ten(value: Decimal, exponent: i64) -> Option<Decimal> {
    let step = if exponent >= 0 {
        Decimal::TEN
    } else {
        Decimal::new(1, 1)
    };
    // 10^64 overflows any non-zero mantissa and 10^-64 rounds it to zero
    let steps = exponent.unsigned_abs().min(64);
    let mut value = value;
    for _ in 0..steps {
        if value.is_zero() {
            break;
        }
        value = value.checked_mul(step)?;
    }
    Some(value)
}

/// Computes log entry prices
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPriceEngine {
    currency: Currency,
}

impl LogPriceEngine {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn price(&self, input: &LogPricingInput<'_>) -> Money {
        let amount = match (input.prices, input.unit) {
            (Some(prices), Some(unit)) => match prices.price_for(unit) {
                Some(rate) => Self::amount_for(rate, unit, input).unwrap_or_else(|| {
                    warn!(%unit, %rate, "Log price overflowed, pricing at zero");
                    Decimal::ZERO
                }),
                None => Decimal::ZERO,
            },
            _ => Decimal::ZERO,
        };
        Money::rounded(amount, self.currency).non_negative()
    }

    /// `None` when `rate` times the quantity or elapsed time overflows
    fn amount_for(rate: Decimal, unit: BillingUnit, input: &LogPricingInput<'_>) -> Option<Decimal> {
        match unit {
            BillingUnit::Bag | BillingUnit::Gallon => {
                rate.checked_mul(input.quantity.unwrap_or(Decimal::ZERO))
            }
            BillingUnit::Trip => Some(rate),
            BillingUnit::Hour | BillingUnit::Day => {
                let time_unit = unit.time_unit().unwrap_or(TimeUnit::Hours);
                match ElapsedSpan::from_optional(input.start_time, input.end_time) {
                    Some(span) => rate.checked_mul(span.non_negative_in(time_unit)),
                    None => Some(Decimal::ZERO),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 7, 0, 0).unwrap()
    }

    fn rates() -> ActionPrices {
        ActionPrices::new()
            .with(BillingUnit::Bag, dec!(5))
            .with(BillingUnit::Gallon, dec!(3.25))
            .with(BillingUnit::Hour, dec!(10))
            .with(BillingUnit::Trip, dec!(20))
            .with(BillingUnit::Day, dec!(240))
    }

    fn price(input: LogPricingInput<'_>) -> Decimal {
        LogPriceEngine::default().price(&input).amount()
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), dec!(3));
        assert_eq!(parse_quantity(" 2.5 "), dec!(2.5));
        assert_eq!(parse_quantity("3 bags"), dec!(3));
        assert_eq!(parse_quantity("4."), dec!(4));
        assert_eq!(parse_quantity(".5"), dec!(0.5));
        assert_eq!(parse_quantity("-2"), dec!(-2));
        assert_eq!(parse_quantity("abc"), Decimal::ZERO);
        assert_eq!(parse_quantity(""), Decimal::ZERO);
        assert_eq!(parse_quantity("-"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_quantity_exponent() {
        assert_eq!(parse_quantity("1e3"), dec!(1000));
        assert_eq!(parse_quantity("2.5E-1 gal"), dec!(0.25));
        assert_eq!(parse_quantity("-4e+2"), dec!(-400));
        // an incomplete exponent is not part of the number
        assert_eq!(parse_quantity("7e"), dec!(7));
        assert_eq!(parse_quantity("7e-x"), dec!(7));
        assert_eq!(parse_quantity("3e-40"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_quantity_saturates() {
        assert_eq!(parse_quantity("79228162514264337593543950335"), Decimal::MAX);
        assert_eq!(parse_quantity("9".repeat(40).as_str()), Decimal::MAX);
        assert_eq!(parse_quantity("1e29"), Decimal::MAX);
        assert_eq!(parse_quantity("-1e99999999999999999999"), -Decimal::MAX);
    }

    #[test]
    fn test_overflowing_quantity_prices_to_zero() {
        let prices = rates();
        let bags = price(LogPricingInput {
            prices: Some(&prices),
            unit: Some(BillingUnit::Bag),
            quantity: Some(parse_quantity("79228162514264337593543950335")),
            ..Default::default()
        });
        assert_eq!(bags, Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_hourly_rate_prices_to_zero() {
        let prices = ActionPrices::new().with(BillingUnit::Hour, Decimal::MAX);
        let hours = price(LogPricingInput {
            prices: Some(&prices),
            unit: Some(BillingUnit::Hour),
            start_time: Some(t0()),
            end_time: Some(t0() + Duration::hours(3)),
            ..Default::default()
        });
        assert_eq!(hours, Decimal::ZERO);
    }

    #[test]
    fn test_bag_times_quantity() {
        let prices = rates();
        assert_eq!(
            price(LogPricingInput {
                prices: Some(&prices),
                unit: Some(BillingUnit::Bag),
                quantity: Some(dec!(3)),
                ..Default::default()
            }),
            dec!(15.00)
        );
    }

    #[test]
    fn test_trip_ignores_quantity_and_times() {
        let prices = rates();
        assert_eq!(
            price(LogPricingInput {
                prices: Some(&prices),
                unit: Some(BillingUnit::Trip),
                quantity: Some(dec!(9)),
                start_time: Some(t0()),
                end_time: Some(t0() + Duration::hours(5)),
            }),
            dec!(20.00)
        );
    }

    #[test]
    fn test_hours_are_fractional() {
        let prices = rates();
        assert_eq!(
            price(LogPricingInput {
                prices: Some(&prices),
                unit: Some(BillingUnit::Hour),
                start_time: Some(t0()),
                end_time: Some(t0() + Duration::minutes(150)),
                ..Default::default()
            }),
            dec!(25.00)
        );
    }

    #[test]
    fn test_day_rate() {
        let prices = rates();
        assert_eq!(
            price(LogPricingInput {
                prices: Some(&prices),
                unit: Some(BillingUnit::Day),
                start_time: Some(t0()),
                end_time: Some(t0() + Duration::hours(36)),
                ..Default::default()
            }),
            dec!(360.00)
        );
    }

    #[test]
    fn test_missing_inputs_price_to_zero() {
        let prices = rates();
        let missing_quantity = price(LogPricingInput {
            prices: Some(&prices),
            unit: Some(BillingUnit::Gallon),
            ..Default::default()
        });
        let missing_end = price(LogPricingInput {
            prices: Some(&prices),
            unit: Some(BillingUnit::Hour),
            start_time: Some(t0()),
            ..Default::default()
        });
        let missing_action = price(LogPricingInput {
            unit: Some(BillingUnit::Trip),
            ..Default::default()
        });
        assert_eq!(missing_quantity, Decimal::ZERO);
        assert_eq!(missing_end, Decimal::ZERO);
        assert_eq!(missing_action, Decimal::ZERO);
    }

    #[test]
    fn test_negative_inputs_floor_at_zero() {
        let prices = rates();
        let negative_quantity = price(LogPricingInput {
            prices: Some(&prices),
            unit: Some(BillingUnit::Bag),
            quantity: Some(dec!(-2)),
            ..Default::default()
        });
        let reversed_times = price(LogPricingInput {
            prices: Some(&prices),
            unit: Some(BillingUnit::Hour),
            start_time: Some(t0()),
            end_time: Some(t0() - Duration::hours(1)),
            ..Default::default()
        });
        assert_eq!(negative_quantity, Decimal::ZERO);
        assert_eq!(reversed_times, Decimal::ZERO);
    }

    #[test]
    fn test_duration_only_for_time_units() {
        let end = Some(t0() + Duration::minutes(90));
        let hours = LogDuration::for_entry(BillingUnit::Hour, Some(t0()), end).unwrap();
        assert_eq!(hours.value, dec!(1.5));
        assert_eq!(hours.unit, TimeUnit::Hours);

        assert!(LogDuration::for_entry(BillingUnit::Trip, Some(t0()), end).is_none());
        assert!(LogDuration::for_entry(BillingUnit::Day, Some(t0()), None).is_none());
    }
}
