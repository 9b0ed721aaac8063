// Webhook event log: type classification, payload accessors, and the
// one-way pending -> processed/failed status transitions.

use serde_json::json;

use squarebridge::webhooks::models::{WebhookEvent, WebhookEventStatus};

fn order_created_event() -> WebhookEvent {
    WebhookEvent::new(
        "evt_1",
        "order.created",
        json!({
            "merchant_id": "MERCHANT_1",
            "data": {
                "type": "order",
                "object": {
                    "order_created": {
                        "order_id": "sq_order_1",
                        "location_id": "sq_loc_1",
                        "state": "OPEN",
                        "version": 1
                    }
                }
            }
        }),
    )
}

#[test]
fn test_type_prefix_predicates() {
    let event = order_created_event();
    assert!(event.is_order_event());
    assert!(!event.is_payment_event());
    assert!(!event.is_refund_event());

    let payment = WebhookEvent::new("evt_2", "payment.updated", json!({}));
    assert!(payment.is_payment_event());
    assert!(!payment.is_order_event());

    let invoice = WebhookEvent::new("evt_3", "invoice.payment_made", json!({}));
    assert!(invoice.is_invoice_event());

    let catalog = WebhookEvent::new("evt_4", "catalog.version.updated", json!({}));
    assert!(catalog.is_catalog_event());

    let oauth = WebhookEvent::new("evt_5", "oauth.authorization.revoked", json!({}));
    assert!(oauth.is_oauth_event());
}

/// The key under which Square nests the affected object varies by type
#[test]
fn test_object_type_key_lookup() {
    assert_eq!(
        WebhookEvent::object_type_key("order.created"),
        Some("order_created")
    );
    assert_eq!(
        WebhookEvent::object_type_key("order.updated"),
        Some("order_updated")
    );
    assert_eq!(
        WebhookEvent::object_type_key("order.fulfillment.updated"),
        Some("order_fulfillment_updated")
    );
    assert_eq!(WebhookEvent::object_type_key("payment.created"), Some("payment"));
    assert_eq!(WebhookEvent::object_type_key("payment.updated"), Some("payment"));
    assert_eq!(WebhookEvent::object_type_key("refund.created"), Some("refund"));
    assert_eq!(WebhookEvent::object_type_key("invoice.created"), None);
}

#[test]
fn test_payload_accessors() {
    let event = order_created_event();

    assert_eq!(event.order_id(), Some("sq_order_1"));
    assert_eq!(event.location_id(), Some("sq_loc_1"));
    assert_eq!(event.merchant_id(), Some("MERCHANT_1"));
    assert_eq!(event.payment_id(), None);
}

#[test]
fn test_payment_id_accessor() {
    let event = WebhookEvent::new(
        "evt_6",
        "payment.created",
        json!({
            "data": {
                "object": {
                    "payment": { "id": "pay_1", "order_id": "sq_order_1" }
                }
            }
        }),
    );

    assert_eq!(event.payment_id(), Some("pay_1"));
    assert_eq!(event.order_id(), Some("sq_order_1"));
}

/// Pending events transition exactly once, to processed or failed
#[test]
fn test_mark_as_processed_transition() {
    let mut event = order_created_event();
    assert!(event.is_pending());

    event.mark_as_processed().unwrap();

    assert_eq!(event.status, WebhookEventStatus::Processed);
    assert!(event.processed_at.is_some());
    assert!(event.error_message.is_none());
}

#[test]
fn test_mark_as_failed_records_error() {
    let mut event = order_created_event();

    event.mark_as_failed("order not found locally").unwrap();

    assert_eq!(event.status, WebhookEventStatus::Failed);
    assert!(event.processed_at.is_some());
    assert_eq!(
        event.error_message.as_deref(),
        Some("order not found locally")
    );
}

/// Terminal events never transition again
#[test]
fn test_terminal_events_cannot_transition() {
    let mut event = order_created_event();
    event.mark_as_processed().unwrap();

    let err = event.mark_as_failed("late failure").unwrap_err();
    assert!(err
        .to_string()
        .contains("Webhook event in processed status cannot transition"));

    let mut failed = order_created_event();
    failed.mark_as_failed("first failure").unwrap();
    assert!(failed.mark_as_processed().is_err());
}

#[test]
fn test_retry_detection() {
    let mut event = order_created_event();
    assert!(!event.is_retry());

    event.retry_number = Some(0);
    assert!(!event.is_retry());

    event.retry_number = Some(2);
    assert!(event.is_retry());
}

#[test]
fn test_description_includes_order_and_retry() {
    let mut event = order_created_event();
    event.retry_number = Some(1);

    let description = event.description();
    assert!(description.contains("order.created"));
    assert!(description.contains("sq_order_1"));
    assert!(description.contains("retry #1"));
}
