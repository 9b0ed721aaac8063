use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The primary recipient snapshot attached to an invoice.
///
/// Stored flat, mirroring Square's recipient shape; `customer_square_id` is
/// the Square customer this recipient resolves to, when one is linked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct InvoiceRecipient {
    pub id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub customer_square_id: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub company_name: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub locality: Option<String>,
    pub administrative_district_level_1: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InvoiceRecipient {
    /// Whether any address component is present
    pub fn has_address(&self) -> bool {
        self.address_line_1.is_some() || self.locality.is_some() || self.postal_code.is_some()
    }
}
