use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A postal address, in Square's field layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub locality: Option<String>,
    pub administrative_district_level_1: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.address_line_1.is_none()
            && self.address_line_2.is_none()
            && self.locality.is_none()
            && self.administrative_district_level_1.is_none()
            && self.postal_code.is_none()
            && self.country.is_none()
    }
}

/// The person a fulfillment is addressed to.
///
/// Deleting the owning fulfillment removes its recipient through the
/// schema's cascade, not application code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub id: Option<i64>,
    pub fulfillment_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub display_name: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<Address>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Recipient {
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// Input fields for resolving or building a recipient
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipientData {
    pub customer_id: Option<i64>,
    pub display_name: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<Address>,
}
