use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Money;

/// One returned line, tracked locally.
///
/// References the original order line by its Square uid string rather than a
/// foreign key: the source order may predate local tracking entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReturnLineItem {
    pub id: Option<i64>,
    pub order_return_id: i64,
    pub product_id: Option<i64>,
    pub quantity: u32,
    pub square_uid: Option<String>,
    pub source_line_item_uid: Option<String>,
    pub catalog_object_id: Option<String>,
    pub catalog_version: Option<i64>,
    pub name: Option<String>,
    pub variation_name: Option<String>,
    pub item_type: Option<String>,
    pub note: Option<String>,
    pub base_price: Option<Money>,
    pub variation_total_price: Option<Money>,
    pub gross_return: Option<Money>,
    pub total_discount: Option<Money>,
    pub total: Option<Money>,
    pub total_service_charge: Option<Money>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderReturnLineItem {
    /// Whether this return line references a line of a locally tracked order
    pub fn has_source_line_item(&self) -> bool {
        self.source_line_item_uid
            .as_deref()
            .is_some_and(|uid| !uid.is_empty())
    }

    /// Whether this return line is linked to a product in the catalog
    pub fn has_product(&self) -> bool {
        self.product_id.is_some()
    }
}
