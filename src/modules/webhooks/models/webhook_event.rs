use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Processing status of a stored webhook delivery.
///
/// Transitions are one-way: pending events become processed or failed, and
/// terminal events never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WebhookEventStatus {
    Pending,
    Processed,
    Failed,
}

impl Default for WebhookEventStatus {
    fn default() -> Self {
        WebhookEventStatus::Pending
    }
}

impl std::fmt::Display for WebhookEventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookEventStatus::Pending => write!(f, "pending"),
            WebhookEventStatus::Processed => write!(f, "processed"),
            WebhookEventStatus::Failed => write!(f, "failed"),
        }
    }
}

/// An append-only record of one inbound Square webhook delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: Option<i64>,
    /// Square's event id; unique per logical event across redeliveries
    pub square_event_id: String,
    pub event_type: String,
    /// Full webhook body as received
    pub event_data: serde_json::Value,
    pub event_time: Option<DateTime<Utc>>,
    pub status: WebhookEventStatus,
    pub processed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub retry_reason: Option<String>,
    pub retry_number: Option<u32>,
    pub initial_delivery_timestamp: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WebhookEvent {
    pub fn new(
        square_event_id: impl Into<String>,
        event_type: impl Into<String>,
        event_data: serde_json::Value,
    ) -> Self {
        Self {
            id: None,
            square_event_id: square_event_id.into(),
            event_type: event_type.into(),
            event_data,
            event_time: None,
            status: WebhookEventStatus::default(),
            processed_at: None,
            error_message: None,
            retry_reason: None,
            retry_number: None,
            initial_delivery_timestamp: None,
            created_at: None,
            updated_at: None,
        }
    }

    //
    // Classification
    //

    pub fn is_catalog_event(&self) -> bool {
        self.event_type.starts_with("catalog.")
    }

    pub fn is_customer_event(&self) -> bool {
        self.event_type.starts_with("customer.")
    }

    pub fn is_invoice_event(&self) -> bool {
        self.event_type.starts_with("invoice.")
    }

    pub fn is_location_event(&self) -> bool {
        self.event_type.starts_with("location.")
    }

    pub fn is_oauth_event(&self) -> bool {
        self.event_type.starts_with("oauth.")
    }

    pub fn is_order_event(&self) -> bool {
        self.event_type.starts_with("order.")
    }

    pub fn is_payment_event(&self) -> bool {
        self.event_type.starts_with("payment.")
    }

    pub fn is_refund_event(&self) -> bool {
        self.event_type.starts_with("refund.")
    }

    /// The key Square nests the affected object under in the event payload.
    ///
    /// Event types store their object under different keys inside
    /// `data.object`; unknown types return None.
    pub fn object_type_key(event_type: &str) -> Option<&'static str> {
        match event_type {
            "order.created" => Some("order_created"),
            "order.fulfillment.updated" => Some("order_fulfillment_updated"),
            "order.updated" => Some("order_updated"),
            "payment.created" | "payment.updated" => Some("payment"),
            "refund.created" | "refund.updated" => Some("refund"),
            _ => None,
        }
    }

    //
    // Payload accessors
    //

    /// The `data.object` block of the payload
    pub fn event_object(&self) -> Option<&serde_json::Value> {
        self.event_data.get("data")?.get("object")
    }

    pub fn order_id(&self) -> Option<&str> {
        let key = Self::object_type_key(&self.event_type)?;
        self.event_object()?.get(key)?.get("order_id")?.as_str()
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.event_object()?.get("payment")?.get("id")?.as_str()
    }

    pub fn merchant_id(&self) -> Option<&str> {
        self.event_data.get("merchant_id")?.as_str()
    }

    pub fn location_id(&self) -> Option<&str> {
        let key = Self::object_type_key(&self.event_type)?;
        self.event_object()?.get(key)?.get("location_id")?.as_str()
    }

    //
    // Status transitions
    //

    pub fn is_pending(&self) -> bool {
        self.status == WebhookEventStatus::Pending
    }

    pub fn is_processed(&self) -> bool {
        self.status == WebhookEventStatus::Processed
    }

    pub fn is_failed(&self) -> bool {
        self.status == WebhookEventStatus::Failed
    }

    /// Mark the event as processed. Only pending events can transition.
    pub fn mark_as_processed(&mut self) -> Result<()> {
        self.ensure_pending()?;
        self.status = WebhookEventStatus::Processed;
        self.processed_at = Some(Utc::now());
        self.error_message = None;
        Ok(())
    }

    /// Mark the event as failed with an error message. Only pending events
    /// can transition.
    pub fn mark_as_failed(&mut self, error_message: impl Into<String>) -> Result<()> {
        self.ensure_pending()?;
        self.status = WebhookEventStatus::Failed;
        self.processed_at = Some(Utc::now());
        self.error_message = Some(error_message.into());
        Ok(())
    }

    fn ensure_pending(&self) -> Result<()> {
        if !self.is_pending() {
            return Err(AppError::invalid_state(format!(
                "Webhook event in {} status cannot transition",
                self.status
            )));
        }
        Ok(())
    }

    //
    // Retry metadata
    //

    /// Whether Square delivered this event as a retry
    pub fn is_retry(&self) -> bool {
        self.retry_number.is_some_and(|n| n > 0)
    }

    /// A human-readable description of the event
    pub fn description(&self) -> String {
        let mut description = if self.is_order_event() {
            format!(
                "Order event ({}) for order {}",
                self.event_type,
                self.order_id().unwrap_or("<unknown>")
            )
        } else if self.is_payment_event() {
            format!(
                "Payment event ({}) for payment {}",
                self.event_type,
                self.payment_id().unwrap_or("<unknown>")
            )
        } else {
            format!("Webhook event ({})", self.event_type)
        };

        if let Some(retry_number) = self.retry_number.filter(|n| *n > 0) {
            description.push_str(&format!(" (retry #{})", retry_number));
        }

        description
    }
}
