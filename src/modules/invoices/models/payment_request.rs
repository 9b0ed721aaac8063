use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Money;

/// What a payment request asks the customer for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentRequestType {
    Balance,
    Deposit,
    Installment,
}

impl std::fmt::Display for PaymentRequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentRequestType::Balance => write!(f, "BALANCE"),
            PaymentRequestType::Deposit => write!(f, "DEPOSIT"),
            PaymentRequestType::Installment => write!(f, "INSTALLMENT"),
        }
    }
}

/// One payment request on an invoice.
///
/// `request_type` and `due_date` are optional at rest so a request can be
/// drafted incrementally, but both must be present before any Square request
/// can be built from the invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoicePaymentRequest {
    pub id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub square_uid: Option<String>,
    pub request_type: Option<PaymentRequestType>,
    pub due_date: Option<NaiveDate>,
    pub tipping_enabled: Option<bool>,
    pub automatic_payment_source: Option<String>,
    pub fixed_amount_requested: Option<Money>,
    /// Percentage of the order total requested, for DEPOSIT requests
    pub percentage_requested: Option<Decimal>,
    // Mirrors of Square-computed amounts
    pub computed_amount: Option<Money>,
    pub total_completed_amount: Option<Money>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InvoicePaymentRequest {
    pub fn balance(due_date: NaiveDate) -> Self {
        Self {
            request_type: Some(PaymentRequestType::Balance),
            due_date: Some(due_date),
            ..Default::default()
        }
    }

    pub fn deposit(due_date: NaiveDate, percentage_requested: Decimal) -> Self {
        Self {
            request_type: Some(PaymentRequestType::Deposit),
            due_date: Some(due_date),
            percentage_requested: Some(percentage_requested),
            ..Default::default()
        }
    }
}
