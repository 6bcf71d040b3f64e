//! Tests for elapsed-duration calculation

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use core_kernel::{DurationCalculator, ElapsedSpan, TimeUnit, Timezone, MILLIS_PER_HOUR};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 7, 30, 0).unwrap()
}

mod elapsed {
    use super::*;

    #[test]
    fn test_zero_span() {
        assert_eq!(DurationCalculator::elapsed_days(start(), start()), Decimal::ZERO);
    }

    #[test]
    fn test_tier_threshold_is_exact() {
        let end = start() + Duration::hours(60);
        assert_eq!(DurationCalculator::elapsed_days(start(), end), dec!(2.5));
    }

    #[test]
    fn test_millisecond_precision() {
        let end = start() + Duration::milliseconds(MILLIS_PER_HOUR + 1);
        let hours = DurationCalculator::elapsed_hours(start(), end);
        assert!(hours > Decimal::ONE);
        assert!(hours < dec!(1.001));
    }

    #[test]
    fn test_elapsed_in_matches_named_helpers() {
        let end = start() + Duration::days(3);
        assert_eq!(
            DurationCalculator::elapsed_in(start(), end, TimeUnit::Hours),
            DurationCalculator::elapsed_hours(start(), end)
        );
        assert_eq!(DurationCalculator::elapsed_hours(start(), end), dec!(72));
    }
}

mod spans {
    use super::*;

    #[test]
    fn test_ordered_accepts_equal_instants() {
        assert!(ElapsedSpan::ordered(start(), start()).is_ok());
    }

    #[test]
    fn test_negative_span_hours() {
        let span = ElapsedSpan::new(start(), start() - Duration::minutes(90));
        assert_eq!(span.hours(), dec!(-1.5));
        assert_eq!(span.non_negative_in(TimeUnit::Hours), Decimal::ZERO);
    }
}

mod timezones {
    use super::*;

    #[test]
    fn test_parse_unknown_zone() {
        assert!(Timezone::parse("Mars/Olympus_Mons").is_none());
    }

    #[test]
    fn test_serde_by_name() {
        let tz = Timezone::parse("America/Denver").unwrap();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"America/Denver\"");
        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tz);
    }

    #[test]
    fn test_day_bounds_across_dst_change() {
        // 2024-03-10 is 23 hours long in Chicago
        let tz = Timezone::parse("America/Chicago").unwrap();
        let (from, to) = tz.day_bounds(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()).unwrap();
        assert_eq!(to - from, Duration::hours(23) - Duration::milliseconds(1));
    }
}
