use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use squarebridge::core::{Currency, Money};

/// Property-based tests for minor-unit money arithmetic
///
/// Validates:
/// - percentage application rounds half away from zero
/// - percentage results never exceed the linear bound by more than rounding
/// - addition and saturating subtraction stay within the same currency
/// - saturating subtraction never produces a negative amount

proptest! {
    #[test]
    fn test_percentage_bounds(
        amount in 0i64..100_000_000i64,
        pct_basis_points in 0u32..10_000u32
    ) {
        let money = Money::new(amount, Currency::USD);
        let pct = Decimal::from_u32(pct_basis_points).unwrap() / Decimal::from(100);

        let result = money.percentage_of(pct);

        // Within half a minor unit of the exact value
        let exact = amount as f64 * pct_basis_points as f64 / 10_000.0;
        let diff = (result.amount as f64 - exact).abs();
        prop_assert!(diff <= 0.5 + f64::EPSILON, "diff {} too large", diff);

        prop_assert!(result.amount >= 0);
        prop_assert_eq!(result.currency, Currency::USD);
    }

    #[test]
    fn test_add_is_commutative(
        a in 0i64..1_000_000i64,
        b in 0i64..1_000_000i64
    ) {
        let lhs = Money::new(a, Currency::EUR);
        let rhs = Money::new(b, Currency::EUR);

        prop_assert_eq!(lhs.add(rhs).unwrap(), rhs.add(lhs).unwrap());
    }

    #[test]
    fn test_saturating_sub_never_negative(
        a in 0i64..1_000_000i64,
        b in 0i64..1_000_000i64
    ) {
        let lhs = Money::new(a, Currency::GBP);
        let rhs = Money::new(b, Currency::GBP);

        let result = lhs.saturating_sub(rhs).unwrap();
        prop_assert!(result.amount >= 0);
        prop_assert_eq!(result.amount, (a - b).max(0));
    }

    #[test]
    fn test_multiply_matches_repeated_add(
        unit in 0i64..100_000i64,
        quantity in 1u32..20u32
    ) {
        let money = Money::new(unit, Currency::USD);
        let product = money.multiply(quantity);

        prop_assert_eq!(product.amount, unit * i64::from(quantity));
    }
}

#[test]
fn test_half_minor_unit_rounds_up() {
    // 2.5% of 4500 = 112.5 -> 113
    let money = Money::new(4500, Currency::USD);
    assert_eq!(money.percentage_of(Decimal::new(25, 1)).amount, 113);
}

#[test]
fn test_cross_currency_arithmetic_rejected() {
    let usd = Money::new(100, Currency::USD);
    let jpy = Money::new(100, Currency::JPY);

    assert!(usd.add(jpy).is_err());
    assert!(usd.saturating_sub(jpy).is_err());
}
