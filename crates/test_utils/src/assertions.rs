//! Custom Test Assertions
//!
//! Assertion helpers for money and port results that print both sides in
//! the domain's own terms.

use rust_decimal::Decimal;

use core_kernel::{Money, PortError};

/// Asserts an exact amount in the expected currency
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );
    assert_eq!(
        actual.amount(),
        expected.amount(),
        "Amount mismatch: actual={actual}, expected={expected}"
    );
}

/// Asserts two amounts differ by at most `tolerance`
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than
/// the tolerance.
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {money}");
}

pub fn assert_money_not_negative(money: &Money) {
    assert!(!money.is_negative(), "Expected a non-negative amount, got {money}");
}

/// Asserts a price never exceeds the equipment's cost cap
pub fn assert_within_cap(price: &Money, cap: Option<Decimal>) {
    if let Some(cap) = cap {
        assert!(
            price.amount() <= cap,
            "Price {price} exceeds the cost cap of {cap}"
        );
    }
}

/// Asserts that a port call failed because the record is missing
pub fn assert_not_found<T: std::fmt::Debug>(result: Result<T, PortError>) {
    match result {
        Err(PortError::NotFound { .. }) => {}
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

/// Asserts that a port call failed validation, optionally on a given field
pub fn assert_validation_error<T: std::fmt::Debug>(result: Result<T, PortError>, field: Option<&str>) {
    match result {
        Err(PortError::Validation { field: actual, .. }) => {
            if let Some(expected) = field {
                assert_eq!(actual.as_deref(), Some(expected), "Validation failed on the wrong field");
            }
        }
        other => panic!("Expected a validation error, got {other:?}"),
    }
}
