// Validation rules for taxes, discounts and service charges: the
// percentage-XOR-fixed-amount rule and the service charge phase/treatment
// compatibility rules.

use rust_decimal_macros::dec;

use squarebridge::core::{Currency, Money};
use squarebridge::deductibles::models::{
    CalculationPhase, DeductibleRate, Discount, ServiceCharge, Tax, TreatmentType,
};

/// A rate must carry exactly one of percentage or fixed amount
#[test]
fn test_rate_requires_exactly_one_of_percentage_or_amount() {
    let both = DeductibleRate::from_parts(
        "Tax",
        Some(dec!(5.0)),
        Some(Money::new(100, Currency::USD)),
    );
    assert!(both
        .unwrap_err()
        .to_string()
        .contains("cannot have both percentage and fixed amount"));

    let neither = DeductibleRate::from_parts("Tax", None, None);
    assert!(neither
        .unwrap_err()
        .to_string()
        .contains("must have either percentage or fixed amount"));
}

/// A zero value counts as unset, matching nullable zero-default columns
#[test]
fn test_zero_values_count_as_unset() {
    // Zero percentage with a real amount resolves to the amount
    let rate = DeductibleRate::from_parts(
        "Discount",
        Some(dec!(0)),
        Some(Money::new(250, Currency::USD)),
    )
    .unwrap();
    assert_eq!(rate.fixed_amount(), Some(Money::new(250, Currency::USD)));

    // Two zeros is the same as neither
    let result =
        DeductibleRate::from_parts("Discount", Some(dec!(0)), Some(Money::zero(Currency::USD)));
    assert!(result.is_err());
}

#[test]
fn test_negative_rates_rejected() {
    assert!(DeductibleRate::from_parts("Tax", Some(dec!(-1)), None).is_err());
    assert!(
        DeductibleRate::from_parts("Tax", None, Some(Money::new(-50, Currency::USD))).is_err()
    );
}

/// The resolved variant answers both accessors consistently
#[test]
fn test_rate_accessors() {
    let pct = DeductibleRate::from_parts("Tax", Some(dec!(8.25)), None).unwrap();
    assert!(pct.is_percentage());
    assert_eq!(pct.percentage(), Some(dec!(8.25)));
    assert_eq!(pct.fixed_amount(), None);

    let fixed =
        DeductibleRate::from_parts("Tax", None, Some(Money::new(100, Currency::USD))).unwrap();
    assert!(fixed.is_fixed_amount());
    assert_eq!(fixed.percentage(), None);
}

#[test]
fn test_tax_and_discount_reject_empty_names() {
    let rate = DeductibleRate::Percentage(dec!(5));
    assert!(Tax::new("", rate).is_err());
    assert!(Discount::new("   ", rate).is_err());
}

/// TOTAL phase service charges cannot be taxable
#[test]
fn test_total_phase_service_charge_cannot_be_taxable() {
    let result = ServiceCharge::new(
        "Late Fee",
        DeductibleRate::Percentage(dec!(2)),
        CalculationPhase::Total,
        TreatmentType::Apportioned,
        true,
    );

    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Total phase service charges cannot be taxable"));

    // The same combination with taxable = false is fine
    let charge = ServiceCharge::new(
        "Late Fee",
        DeductibleRate::Percentage(dec!(2)),
        CalculationPhase::Total,
        TreatmentType::Apportioned,
        false,
    );
    assert!(charge.is_ok());
}

/// APPORTIONED_AMOUNT phase cannot use LINE_ITEM treatment
#[test]
fn test_apportioned_amount_phase_rejects_line_item_treatment() {
    let result = ServiceCharge::new(
        "Delivery",
        DeductibleRate::Fixed(Money::new(500, Currency::USD)),
        CalculationPhase::ApportionedAmount,
        TreatmentType::LineItem,
        false,
    );

    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Apportioned amount phase cannot be used with line item treatment"));
}

/// The phase rules also run on update, so a saved charge cannot be mutated
/// into an invalid combination
#[test]
fn test_phase_rules_rerun_on_update() {
    let result = ServiceCharge::validate_phase_rules(
        CalculationPhase::ApportionedAmount,
        TreatmentType::LineItem,
        false,
    );
    assert!(result.is_err());

    let result =
        ServiceCharge::validate_phase_rules(CalculationPhase::Total, TreatmentType::Apportioned, true);
    assert!(result.is_err());
}

/// Attaching a SUBTOTAL-phase charge at line scope is permitted; only its
/// application there is rejected. The two stages are deliberately distinct.
#[test]
fn test_subtotal_phase_line_item_application_rejected_separately() {
    let charge = ServiceCharge::new(
        "Handling",
        DeductibleRate::Percentage(dec!(5)),
        CalculationPhase::Subtotal,
        TreatmentType::LineItem,
        false,
    )
    .unwrap();

    let result = charge.validate_line_item_application();
    assert!(result.unwrap_err().to_string().contains(
        "Subtotal phase service charges cannot be applied at the product (line-item) level"
    ));

    // TOTAL phase is computable at the line level
    let charge = ServiceCharge::new(
        "Card Fee",
        DeductibleRate::Percentage(dec!(3)),
        CalculationPhase::Total,
        TreatmentType::LineItem,
        false,
    )
    .unwrap();
    assert!(charge.validate_line_item_application().is_ok());
}
