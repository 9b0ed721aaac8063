use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Which payment methods an invoice accepts
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct InvoiceAcceptedPaymentMethods {
    pub id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub card: bool,
    pub square_gift_card: bool,
    pub bank_account: bool,
    pub buy_now_pay_later: bool,
    pub cash_app_pay: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InvoiceAcceptedPaymentMethods {
    pub fn card_only() -> Self {
        Self {
            card: true,
            ..Default::default()
        }
    }
}
