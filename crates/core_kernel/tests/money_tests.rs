//! Tests for Money and Multiplier as the pricing engines use them

use core_kernel::{Currency, Money, MoneyError, Multiplier, MAX_AMOUNT};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod rounding {
    use super::*;

    #[test]
    fn test_new_keeps_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_rounded_goes_straight_to_cents() {
        // rounding via 4 places first would give 1.0050 and then 1.01
        let m = Money::rounded(dec!(1.00495), Currency::USD);
        assert_eq!(m.amount(), dec!(1.00));
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(Money::rounded(dec!(2.675), Currency::USD).amount(), dec!(2.68));
        assert_eq!(Money::rounded(dec!(-2.675), Currency::USD).amount(), dec!(-2.68));
    }

    #[test]
    fn test_weekly_fraction_rounds_to_cents() {
        // 40 days at 300/week
        let raw = dec!(300) * (dec!(40) / dec!(7));
        assert_eq!(Money::rounded(raw, Currency::USD).amount(), dec!(1714.29));
    }
}

mod capping {
    use super::*;

    #[test]
    fn test_cap_applies_only_above_ceiling() {
        let price = Money::rounded(dec!(180), Currency::USD);
        assert_eq!(price.capped_at(dec!(160)).amount(), dec!(160));
        assert_eq!(price.capped_at(dec!(200)).amount(), dec!(180));
    }

    #[test]
    fn test_cap_keeps_currency() {
        let price = Money::rounded(dec!(50), Currency::GBP);
        assert_eq!(price.capped_at(dec!(10)).currency(), Currency::GBP);
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        let refund = Money::new(dec!(-8), Currency::CAD);
        assert!(refund.is_negative());
        assert!(refund.non_negative().is_zero());
    }

    #[test]
    fn test_storable_bound_matches_numeric_19_4() {
        assert_eq!(MAX_AMOUNT.scale(), 4);
        assert_eq!(MAX_AMOUNT.trunc().to_string().len(), 15);
        let over = Money::new(Decimal::MAX, Currency::USD);
        assert_eq!(over.ensure_storable(), Err(MoneyError::OutOfRange(Decimal::MAX)));
    }
}

mod currency {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!(" Mxn ".parse::<Currency>().unwrap(), Currency::MXN);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!("XYZ".parse::<Currency>(), Err(MoneyError::UnknownCurrency(_))));
    }

    #[test]
    fn test_display_uses_symbol() {
        assert_eq!(Money::new(dec!(12.5), Currency::CAD).to_string(), "C$12.50");
    }
}

mod multiplier {
    use super::*;

    #[test]
    fn test_identity_is_default() {
        assert_eq!(Multiplier::default(), Multiplier::IDENTITY);
        assert_eq!(Multiplier::IDENTITY.as_decimal(), Decimal::ONE);
    }

    #[test]
    fn test_display() {
        assert_eq!(Multiplier::new(dec!(1.20)).to_string(), "x1.2");
    }

    #[test]
    fn test_checked_apply_reports_overflow() {
        let driver = Multiplier::new(dec!(1.2));
        assert_eq!(driver.checked_apply(dec!(150)), Some(dec!(180.0)));
        assert_eq!(driver.checked_apply(Decimal::MAX), None);
    }

    #[test]
    fn test_serializes_as_bare_decimal() {
        let json = serde_json::to_string(&Multiplier::new(dec!(1.2))).unwrap();
        assert_eq!(json, "\"1.2\"");
    }
}
