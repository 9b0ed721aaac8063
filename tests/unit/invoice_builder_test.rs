// Invoice request building: the precondition chain, the produced wire
// shapes, and the one-directional sync back from Square responses.

use chrono::NaiveDate;

use squarebridge::core::{Currency, Money};
use squarebridge::invoices::models::{
    Invoice, InvoiceAcceptedPaymentMethods, InvoiceAggregate, InvoiceCustomField,
    InvoicePaymentRequest, InvoiceStatus,
};
use squarebridge::invoices::services::InvoiceBuilder;
use squarebridge::orders::models::{Location, OrderRef};
use squarebridge::square::models::{SquareInvoice, SquareMoney};

fn location() -> Location {
    Location {
        id: Some(1),
        name: "Main Street".to_string(),
        square_location_id: Some("sq_loc_1".to_string()),
        currency: Currency::USD,
        timezone: None,
        created_at: None,
        updated_at: None,
    }
}

fn due_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
}

/// A fully satisfied aggregate: order with a Square id, location, one
/// complete payment request, accepted payment methods
fn complete_aggregate() -> InvoiceAggregate {
    let mut aggregate = InvoiceAggregate::new(Invoice::new(1, 1))
        .with_order(OrderRef::with_square_id(1, "sq_order_1"))
        .with_location(location());
    aggregate.payment_requests = vec![InvoicePaymentRequest::balance(due_date())];
    aggregate.accepted_payment_methods = Some(InvoiceAcceptedPaymentMethods::card_only());
    aggregate
}

#[test]
fn test_create_request_requires_an_order() {
    let mut aggregate = complete_aggregate();
    aggregate.order = None;

    let err = InvoiceBuilder::build_create_invoice_request(&aggregate).unwrap_err();
    assert!(err
        .to_string()
        .contains("Cannot create invoice without an associated order"));
}

#[test]
fn test_create_request_requires_a_square_order_id() {
    let mut aggregate = complete_aggregate();
    aggregate.order = Some(OrderRef::new(1));

    let err = InvoiceBuilder::build_create_invoice_request(&aggregate).unwrap_err();
    assert!(err
        .to_string()
        .contains("Cannot create invoice without a Square order ID"));
}

#[test]
fn test_create_request_requires_a_square_location_id() {
    let mut aggregate = complete_aggregate();
    aggregate.location = None;

    let err = InvoiceBuilder::build_create_invoice_request(&aggregate).unwrap_err();
    assert!(err
        .to_string()
        .contains("Cannot create invoice without a Square location ID"));
}

#[test]
fn test_create_request_requires_a_payment_request() {
    let mut aggregate = complete_aggregate();
    aggregate.payment_requests.clear();

    let err = InvoiceBuilder::build_create_invoice_request(&aggregate).unwrap_err();
    assert!(err
        .to_string()
        .contains("Cannot create invoice without at least one payment request"));
}

#[test]
fn test_create_request_requires_payment_request_type() {
    let mut aggregate = complete_aggregate();
    aggregate.payment_requests[0].request_type = None;

    let err = InvoiceBuilder::build_create_invoice_request(&aggregate).unwrap_err();
    assert!(err
        .to_string()
        .contains("Payment request is missing required field: request_type"));
}

#[test]
fn test_create_request_requires_payment_request_due_date() {
    let mut aggregate = complete_aggregate();
    aggregate.payment_requests[0].due_date = None;

    let err = InvoiceBuilder::build_create_invoice_request(&aggregate).unwrap_err();
    assert!(err
        .to_string()
        .contains("Payment request is missing required field: due_date"));
}

#[test]
fn test_create_request_requires_accepted_payment_methods() {
    let mut aggregate = complete_aggregate();
    aggregate.accepted_payment_methods = None;

    let err = InvoiceBuilder::build_create_invoice_request(&aggregate).unwrap_err();
    assert!(err
        .to_string()
        .contains("Cannot create invoice without accepted payment methods"));
}

/// With every precondition satisfied, the request carries the order's and
/// location's Square identifiers and the mapped children
#[test]
fn test_create_request_maps_identifiers_and_children() {
    let mut aggregate = complete_aggregate();
    aggregate.custom_fields = vec![InvoiceCustomField::new("PO Number", "PO-1042")];

    let request = InvoiceBuilder::build_create_invoice_request(&aggregate).unwrap();

    assert_eq!(request.invoice.order_id.as_deref(), Some("sq_order_1"));
    assert_eq!(request.invoice.location_id.as_deref(), Some("sq_loc_1"));
    assert!(!request.idempotency_key.is_empty());

    let payment_requests = request.invoice.payment_requests.unwrap();
    assert_eq!(payment_requests.len(), 1);
    assert_eq!(payment_requests[0].request_type.as_deref(), Some("BALANCE"));
    assert_eq!(payment_requests[0].due_date.as_deref(), Some("2026-09-01"));

    let methods = request.invoice.accepted_payment_methods.unwrap();
    assert_eq!(methods.card, Some(true));
    assert_eq!(methods.bank_account, Some(false));

    let custom_fields = request.invoice.custom_fields.unwrap();
    assert_eq!(custom_fields[0].label.as_deref(), Some("PO Number"));
}

/// Each build call generates a fresh idempotency key; retries are the
/// caller's responsibility
#[test]
fn test_idempotency_key_is_fresh_per_build() {
    let aggregate = complete_aggregate();

    let first = InvoiceBuilder::build_create_invoice_request(&aggregate).unwrap();
    let second = InvoiceBuilder::build_create_invoice_request(&aggregate).unwrap();

    assert_ne!(first.idempotency_key, second.idempotency_key);
}

/// Update requests share the create preconditions and carry the supplied
/// version
#[test]
fn test_update_request_carries_version() {
    let aggregate = complete_aggregate();

    let request = InvoiceBuilder::build_update_invoice_request(&aggregate, 4).unwrap();
    assert_eq!(request.invoice.version, Some(4));

    let mut incomplete = complete_aggregate();
    incomplete.payment_requests.clear();
    assert!(InvoiceBuilder::build_update_invoice_request(&incomplete, 4).is_err());
}

#[test]
fn test_publish_request_carries_version_and_key() {
    let request = InvoiceBuilder::build_publish_invoice_request(2);
    assert_eq!(request.version, 2);
    assert!(!request.idempotency_key.is_empty());
}

fn square_response() -> SquareInvoice {
    SquareInvoice {
        id: Some("inv_123".to_string()),
        version: Some(3),
        status: Some("UNPAID".to_string()),
        public_url: Some("https://squareup.com/pay/inv_123".to_string()),
        invoice_number: Some("000042".to_string()),
        next_payment_amount_money: Some(SquareMoney::new(2200, "USD")),
        ..Default::default()
    }
}

/// Sync overwrites the vendor-owned fields and leaves local-only fields
/// untouched
#[test]
fn test_sync_overwrites_vendor_fields_only() {
    let mut invoice = Invoice::new(1, 1);
    invoice.title = Some("September retainer".to_string());

    InvoiceBuilder::sync_from_square_response(&mut invoice, &square_response()).unwrap();

    assert_eq!(invoice.payment_service_id.as_deref(), Some("inv_123"));
    assert_eq!(invoice.payment_service_version, Some(3));
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);
    assert_eq!(
        invoice.public_url.as_deref(),
        Some("https://squareup.com/pay/inv_123")
    );
    assert_eq!(invoice.invoice_number.as_deref(), Some("000042"));
    assert_eq!(
        invoice.next_payment_amount,
        Some(Money::new(2200, Currency::USD))
    );

    // Local-only field untouched
    assert_eq!(invoice.title.as_deref(), Some("September retainer"));
}

/// Applying the same response twice produces identical state both times
#[test]
fn test_sync_is_idempotent_for_a_fixed_response() {
    let response = square_response();

    let mut once = Invoice::new(1, 1);
    InvoiceBuilder::sync_from_square_response(&mut once, &response).unwrap();

    let mut twice = once.clone();
    InvoiceBuilder::sync_from_square_response(&mut twice, &response).unwrap();

    assert_eq!(once.payment_service_id, twice.payment_service_id);
    assert_eq!(once.payment_service_version, twice.payment_service_version);
    assert_eq!(once.status, twice.status);
    assert_eq!(once.public_url, twice.public_url);
    assert_eq!(once.invoice_number, twice.invoice_number);
    assert_eq!(once.next_payment_amount, twice.next_payment_amount);
}

#[test]
fn test_sync_rejects_unknown_status() {
    let mut invoice = Invoice::new(1, 1);
    let mut response = square_response();
    response.status = Some("MYSTERY".to_string());

    assert!(InvoiceBuilder::sync_from_square_response(&mut invoice, &response).is_err());
}

/// Terminal invoices refuse mutating operations, naming the current status
#[test]
fn test_terminal_invoice_is_read_only() {
    for status in [
        InvoiceStatus::Paid,
        InvoiceStatus::Refunded,
        InvoiceStatus::Canceled,
        InvoiceStatus::Failed,
    ] {
        let mut invoice = Invoice::new(1, 1);
        invoice.status = status;

        let err = invoice.ensure_mutable().unwrap_err();
        assert!(err.to_string().contains(&status.to_string()));
    }
}

/// Only DRAFT invoices can be published
#[test]
fn test_only_draft_invoices_publishable() {
    let mut invoice = Invoice::new(1, 1);
    assert!(invoice.ensure_publishable().is_ok());

    invoice.status = InvoiceStatus::Unpaid;
    let err = invoice.ensure_publishable().unwrap_err();
    assert!(err.to_string().contains("Only DRAFT invoices can be published"));
}
