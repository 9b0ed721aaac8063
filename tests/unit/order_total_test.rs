// Order total calculation: fixed precedence of line-scoped and order-scoped
// discounts, taxes and service charges over integer minor-unit money.

use rust_decimal_macros::dec;

use squarebridge::core::{Currency, Money};
use squarebridge::deductibles::models::{
    AttachmentScope, CalculationPhase, DeductibleRate, Discount, ServiceCharge, Tax, TreatmentType,
};
use squarebridge::orders::models::{
    Attached, LineItemAggregate, OrderAggregate, OrderLineItem, OrderRef, Product,
};
use squarebridge::orders::services::calculate_order_total;

fn usd(amount: i64) -> Money {
    Money::new(amount, Currency::USD)
}

fn line(quantity: u32, unit_price: i64) -> LineItemAggregate {
    let product = Product::new("Coffee", Some(usd(unit_price))).unwrap();
    let line = OrderLineItem::new(1, 1, quantity, None).unwrap();
    LineItemAggregate::new(line, product)
}

fn order_with_lines(lines: Vec<LineItemAggregate>) -> OrderAggregate {
    OrderAggregate::new(OrderRef::new(1)).with_line_items(lines)
}

fn percentage_charge(pct: rust_decimal::Decimal, phase: CalculationPhase) -> Attached<ServiceCharge> {
    let charge = ServiceCharge::new(
        "Service Fee",
        DeductibleRate::Percentage(pct),
        phase,
        TreatmentType::Apportioned,
        false,
    )
    .unwrap();
    Attached::new(charge, AttachmentScope::Order)
}

fn fixed_charge(amount: i64, phase: CalculationPhase) -> Attached<ServiceCharge> {
    let charge = ServiceCharge::new(
        "Flat Fee",
        DeductibleRate::Fixed(usd(amount)),
        phase,
        TreatmentType::Apportioned,
        false,
    )
    .unwrap();
    Attached::new(charge, AttachmentScope::Order)
}

/// Reference fixture: 2 x $10.00 + 5% service charge + $1.00 flat charge
/// comes to exactly $22.00
#[test]
fn test_order_total_with_percentage_and_flat_charges() {
    let mut order = order_with_lines(vec![line(2, 1000)]);
    order.service_charges = vec![
        percentage_charge(dec!(5), CalculationPhase::Subtotal),
        fixed_charge(100, CalculationPhase::Subtotal),
    ];

    let totals = calculate_order_total(&order).unwrap();

    assert_eq!(totals.gross_sales, usd(2000));
    assert_eq!(totals.total_service_charge, usd(200));
    assert_eq!(totals.total, usd(2200));
}

/// Reference fixture: 3 x $15.00 with a 2.5% charge rounds the half-cent up
/// to $46.13
#[test]
fn test_order_total_rounds_half_up() {
    let product = Product::new("Custom Cake", None).unwrap();
    let line_item = OrderLineItem::new(1, 1, 3, Some(usd(1500))).unwrap();
    let mut order = order_with_lines(vec![LineItemAggregate::new(line_item, product)]);
    order.service_charges = vec![percentage_charge(dec!(2.5), CalculationPhase::Subtotal)];

    let totals = calculate_order_total(&order).unwrap();

    // 4500 x 2.5% = 112.5, rounded to 113
    assert_eq!(totals.total_service_charge, usd(113));
    assert_eq!(totals.total, usd(4613));
}

/// Line-scoped discounts apply before line-scoped taxes
#[test]
fn test_line_discount_applies_before_line_tax() {
    let mut li = line(1, 1000);
    li.discounts = vec![Attached::new(
        Discount::new("10% Off", DeductibleRate::Percentage(dec!(10))).unwrap(),
        AttachmentScope::LineItem,
    )];
    li.taxes = vec![Attached::new(
        Tax::new("Sales Tax", DeductibleRate::Percentage(dec!(10))).unwrap(),
        AttachmentScope::LineItem,
    )];

    let totals = calculate_order_total(&order_with_lines(vec![li])).unwrap();

    // 1000 - 10% = 900; tax 10% of 900 = 90
    assert_eq!(totals.total_discount, usd(100));
    assert_eq!(totals.total_tax, usd(90));
    assert_eq!(totals.total, usd(990));
}

/// A fixed line discount larger than the line clamps it at zero instead of
/// going negative
#[test]
fn test_fixed_discount_clamps_line_at_zero() {
    let mut li = line(1, 500);
    li.discounts = vec![Attached::new(
        Discount::new("Comp", DeductibleRate::Fixed(usd(800))).unwrap(),
        AttachmentScope::LineItem,
    )];

    let totals = calculate_order_total(&order_with_lines(vec![li])).unwrap();

    assert_eq!(totals.total_discount, usd(500));
    assert_eq!(totals.total, usd(0));
}

/// Order-scoped discounts reduce the subtotal before order-scoped taxes
#[test]
fn test_order_discount_applies_before_order_tax() {
    let mut order = order_with_lines(vec![line(2, 1000)]);
    order.discounts = vec![Attached::new(
        Discount::new("10% Off", DeductibleRate::Percentage(dec!(10))).unwrap(),
        AttachmentScope::Order,
    )];
    order.taxes = vec![Attached::new(
        Tax::new("Sales Tax", DeductibleRate::Percentage(dec!(5))).unwrap(),
        AttachmentScope::Order,
    )];

    let totals = calculate_order_total(&order).unwrap();

    // 2000 - 10% = 1800; tax 5% of 1800 = 90
    assert_eq!(totals.total_discount, usd(200));
    assert_eq!(totals.total_tax, usd(90));
    assert_eq!(totals.total, usd(1890));
}

/// Disabled deductibles are skipped entirely
#[test]
fn test_disabled_deductibles_are_skipped() {
    let mut disabled = Discount::new("Expired", DeductibleRate::Percentage(dec!(50))).unwrap();
    disabled.enabled = false;

    let mut order = order_with_lines(vec![line(1, 1000)]);
    order.discounts = vec![Attached::new(disabled, AttachmentScope::Order)];

    let totals = calculate_order_total(&order).unwrap();
    assert_eq!(totals.total, usd(1000));
}

/// A taxable SUBTOTAL-phase charge joins the base of order-scoped
/// percentage taxes
#[test]
fn test_taxable_subtotal_charge_included_in_tax_base() {
    let taxable = ServiceCharge::new(
        "Setup Fee",
        DeductibleRate::Percentage(dec!(10)),
        CalculationPhase::Subtotal,
        TreatmentType::Apportioned,
        true,
    )
    .unwrap();

    let mut order = order_with_lines(vec![line(1, 1000)]);
    order.service_charges = vec![Attached::new(taxable, AttachmentScope::Order)];
    order.taxes = vec![Attached::new(
        Tax::new("Sales Tax", DeductibleRate::Percentage(dec!(10))).unwrap(),
        AttachmentScope::Order,
    )];

    let totals = calculate_order_total(&order).unwrap();

    // charge = 100; tax base = 1000 + 100 = 1100; tax = 110
    assert_eq!(totals.total_service_charge, usd(100));
    assert_eq!(totals.total_tax, usd(110));
    assert_eq!(totals.total, usd(1210));
}

/// TOTAL-phase charges compute against the running total including taxes
/// and SUBTOTAL-phase charges
#[test]
fn test_total_phase_charge_applies_after_taxes() {
    let mut order = order_with_lines(vec![line(1, 1000)]);
    order.taxes = vec![Attached::new(
        Tax::new("Sales Tax", DeductibleRate::Percentage(dec!(10))).unwrap(),
        AttachmentScope::Order,
    )];
    order.service_charges = vec![percentage_charge(dec!(5), CalculationPhase::Total)];

    let totals = calculate_order_total(&order).unwrap();

    // 1000 + tax 100 = 1100; total-phase 5% of 1100 = 55
    assert_eq!(totals.total_service_charge, usd(55));
    assert_eq!(totals.total, usd(1155));
}

/// APPORTIONED_AMOUNT charges distribute a fixed amount across lines
/// proportionally by line total, with the shares summing exactly
#[test]
fn test_apportioned_charge_distributes_across_lines() {
    let mut order = order_with_lines(vec![line(1, 300), line(1, 100)]);
    order.service_charges = vec![fixed_charge(100, CalculationPhase::ApportionedAmount)];

    let totals = calculate_order_total(&order).unwrap();

    assert_eq!(totals.total_service_charge, usd(100));
    assert_eq!(totals.total, usd(500));
    assert_eq!(totals.line_totals[0].total_service_charge, usd(75));
    assert_eq!(totals.line_totals[1].total_service_charge, usd(25));
    assert_eq!(totals.line_totals[0].total, usd(375));
    assert_eq!(totals.line_totals[1].total, usd(125));
}

/// A SUBTOTAL-phase charge attached at line scope is rejected during
/// calculation, naming the offending phase; the attachment itself is legal
#[test]
fn test_subtotal_phase_charge_at_line_scope_fails_calculation() {
    let charge = ServiceCharge::new(
        "Handling",
        DeductibleRate::Percentage(dec!(5)),
        CalculationPhase::Subtotal,
        TreatmentType::LineItem,
        false,
    )
    .unwrap();

    let mut li = line(2, 1000);
    li.service_charges = vec![Attached::new(charge, AttachmentScope::LineItem)];

    let err = calculate_order_total(&order_with_lines(vec![li])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation error: Service charge calculation phase \"SUBTOTAL\" cannot be applied to products in an order"
    );
}

/// TOTAL-phase charges with LINE_ITEM treatment apply at the line level
#[test]
fn test_total_phase_line_item_charge_applies_per_line() {
    let charge = ServiceCharge::new(
        "Card Fee",
        DeductibleRate::Percentage(dec!(3)),
        CalculationPhase::Total,
        TreatmentType::LineItem,
        false,
    )
    .unwrap();

    let mut li = line(1, 1000);
    li.service_charges = vec![Attached::new(charge, AttachmentScope::LineItem)];

    let totals = calculate_order_total(&order_with_lines(vec![li])).unwrap();
    assert_eq!(totals.total_service_charge, usd(30));
    assert_eq!(totals.total, usd(1030));
}

/// A percentage-based APPORTIONED_AMOUNT charge is a calculation error
#[test]
fn test_apportioned_percentage_charge_rejected() {
    let mut order = order_with_lines(vec![line(1, 1000)]);
    order.service_charges = vec![percentage_charge(dec!(5), CalculationPhase::ApportionedAmount)];

    let err = calculate_order_total(&order).unwrap_err();
    assert!(err.to_string().contains("must use a fixed amount"));
}

/// An order without line items cannot be totalled
#[test]
fn test_empty_order_rejected() {
    let order = OrderAggregate::new(OrderRef::new(1));
    let err = calculate_order_total(&order).unwrap_err();
    assert!(err.to_string().contains("without line items"));
}

/// All inputs must share a single currency
#[test]
fn test_mixed_currencies_rejected() {
    let eur_product = Product::new("Espresso", Some(Money::new(300, Currency::EUR))).unwrap();
    let eur_line = OrderLineItem::new(1, 2, 1, None).unwrap();

    let order = order_with_lines(vec![
        line(1, 1000),
        LineItemAggregate::new(eur_line, eur_product),
    ]);

    let err = calculate_order_total(&order).unwrap_err();
    assert!(err.to_string().contains("Currency mismatch"));
}

/// The final total never goes negative, whatever the discounts say
#[test]
fn test_total_clamped_non_negative() {
    let mut order = order_with_lines(vec![line(1, 500)]);
    order.discounts = vec![Attached::new(
        Discount::new("Comp", DeductibleRate::Fixed(usd(2000))).unwrap(),
        AttachmentScope::Order,
    )];

    let totals = calculate_order_total(&order).unwrap();
    assert_eq!(totals.total, usd(0));
}
