// Refund quantity integrity: a line-item refund must not exceed the
// purchased quantity, checked synchronously before persistence.

use squarebridge::deductibles::models::FeaturableKind;
use squarebridge::orders::models::{Refund, RefundTarget};

#[test]
fn test_refund_rejects_zero_quantity() {
    let result = Refund::new(RefundTarget::LineItem(1), 0, None);
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Refund quantity must be positive"));
}

/// A refund up to and including the purchased quantity passes the check
#[test]
fn test_refund_within_purchased_quantity_allowed() {
    let refund = Refund::new(RefundTarget::LineItem(1), 2, Some("damaged".to_string())).unwrap();
    assert!(refund.check_refund_quantity(3).is_ok());

    // The boundary case: refund everything that was purchased
    let refund = Refund::new(RefundTarget::LineItem(1), 3, None).unwrap();
    assert!(refund.check_refund_quantity(3).is_ok());
}

/// Exceeding the purchased quantity is a quantity-integrity error
#[test]
fn test_refund_exceeding_purchased_quantity_rejected() {
    let refund = Refund::new(RefundTarget::LineItem(1), 4, None).unwrap();

    let err = refund.check_refund_quantity(3).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Quantity error: Refund quantity exceeds product quantity"
    );
}

/// The quantity check only applies to line-item refunds; whole-order
/// refunds carry no per-line quantity to compare against
#[test]
fn test_order_refund_skips_quantity_check() {
    let refund = Refund::new(RefundTarget::Order(1), 10, None).unwrap();
    assert!(refund.check_refund_quantity(1).is_ok());
}

/// Targets map onto the polymorphic refundable reference used by the
/// refunds table
#[test]
fn test_refund_target_maps_to_featurable() {
    let order_ref = RefundTarget::Order(7).as_featurable();
    assert_eq!(order_ref.kind, FeaturableKind::Order);
    assert_eq!(order_ref.id, 7);

    let line_ref = RefundTarget::LineItem(9).as_featurable();
    assert_eq!(line_ref.kind, FeaturableKind::LineItem);
    assert_eq!(line_ref.id, 9);
}

#[test]
fn test_new_refund_starts_pending() {
    let refund = Refund::new(RefundTarget::LineItem(1), 1, None).unwrap();
    assert_eq!(refund.status, Default::default());
    assert!(refund.id.is_none());
}
