use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Money, Result};

/// Invoice status lifecycle, as Square reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(30)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Created locally and/or at Square, not yet published
    Draft,

    /// Published and awaiting payment
    Unpaid,

    /// Scheduled for delivery at a future date
    Scheduled,

    /// A payment is being processed
    PaymentPending,

    /// At least one payment request has been paid
    PartiallyPaid,

    /// Fully paid
    Paid,

    /// Partially refunded after payment
    PartiallyRefunded,

    /// Fully refunded
    Refunded,

    /// Canceled before payment completed
    Canceled,

    /// Payment failed
    Failed,
}

impl InvoiceStatus {
    /// Terminal statuses allow no further mutating vendor operations
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvoiceStatus::Paid
                | InvoiceStatus::Refunded
                | InvoiceStatus::Canceled
                | InvoiceStatus::Failed
        )
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Unpaid => "UNPAID",
            InvoiceStatus::Scheduled => "SCHEDULED",
            InvoiceStatus::PaymentPending => "PAYMENT_PENDING",
            InvoiceStatus::PartiallyPaid => "PARTIALLY_PAID",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::PartiallyRefunded => "PARTIALLY_REFUNDED",
            InvoiceStatus::Refunded => "REFUNDED",
            InvoiceStatus::Canceled => "CANCELED",
            InvoiceStatus::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(InvoiceStatus::Draft),
            "UNPAID" => Ok(InvoiceStatus::Unpaid),
            "SCHEDULED" => Ok(InvoiceStatus::Scheduled),
            "PAYMENT_PENDING" => Ok(InvoiceStatus::PaymentPending),
            "PARTIALLY_PAID" => Ok(InvoiceStatus::PartiallyPaid),
            "PAID" => Ok(InvoiceStatus::Paid),
            "PARTIALLY_REFUNDED" => Ok(InvoiceStatus::PartiallyRefunded),
            "REFUNDED" => Ok(InvoiceStatus::Refunded),
            "CANCELED" => Ok(InvoiceStatus::Canceled),
            "FAILED" => Ok(InvoiceStatus::Failed),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// How Square delivers the invoice to the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    Email,
    ShareManually,
    Sms,
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMethod::Email => write!(f, "EMAIL"),
            DeliveryMethod::ShareManually => write!(f, "SHARE_MANUALLY"),
            DeliveryMethod::Sms => write!(f, "SMS"),
        }
    }
}

/// A local invoice, 1:1 with an order.
///
/// `payment_service_id` and `payment_service_version` are only populated
/// after a successful create call to Square.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Option<i64>,
    pub order_id: i64,
    pub location_id: i64,
    /// Square's invoice id
    pub payment_service_id: Option<String>,
    /// Square's optimistic-locking version
    pub payment_service_version: Option<i64>,
    pub invoice_number: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub public_url: Option<String>,
    pub status: InvoiceStatus,
    pub delivery_method: Option<DeliveryMethod>,
    pub timezone: Option<String>,
    pub sale_or_service_date: Option<NaiveDate>,
    pub payment_conditions: Option<String>,
    pub store_payment_method_enabled: bool,
    pub next_payment_amount: Option<Money>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Invoice {
    pub fn new(order_id: i64, location_id: i64) -> Self {
        Self {
            id: None,
            order_id,
            location_id,
            payment_service_id: None,
            payment_service_version: None,
            invoice_number: None,
            title: None,
            description: None,
            scheduled_at: None,
            public_url: None,
            status: InvoiceStatus::default(),
            delivery_method: None,
            timezone: None,
            sale_or_service_date: None,
            payment_conditions: None,
            store_payment_method_enabled: false,
            next_payment_amount: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Check if the invoice is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Guard for mutating vendor operations: terminal invoices are read-only
    pub fn ensure_mutable(&self) -> Result<()> {
        if self.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Cannot update invoice in {} status",
                self.status
            )));
        }

        Ok(())
    }

    /// Guard for publishing: only drafts can be published
    pub fn ensure_publishable(&self) -> Result<()> {
        if self.status != InvoiceStatus::Draft {
            return Err(AppError::invalid_state(
                "Only DRAFT invoices can be published",
            ));
        }

        Ok(())
    }
}
