use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::modules::square::models::{SquareOrderReturn, SquareOrderReturnLineItem};

/// A return against a prior order, mirrored from Square.
///
/// The full return payload is stored as JSON and exposed through a typed
/// accessor; this crate never edits a return, only records what Square
/// reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReturn {
    pub id: Option<i64>,
    /// Local order the return applies to, when one is known
    pub order_id: Option<i64>,
    /// Square's id for the order the return was made against
    pub source_order_id: String,
    /// Raw Square return payload
    pub data: serde_json::Value,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderReturn {
    pub fn new(source_order_id: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: None,
            order_id: None,
            source_order_id: source_order_id.into(),
            data,
            created_at: None,
            updated_at: None,
        }
    }

    /// The stored payload parsed into Square's return shape
    pub fn return_data(&self) -> Result<SquareOrderReturn> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// The return's line items, or an empty list when none were reported
    pub fn return_line_items(&self) -> Result<Vec<SquareOrderReturnLineItem>> {
        Ok(self.return_data()?.return_line_items.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_return_data_round_trips_payload() {
        let payload = json!({
            "uid": "ret_1",
            "source_order_id": "order_abc",
            "return_line_items": [
                {
                    "uid": "rli_1",
                    "source_line_item_uid": "li_9",
                    "name": "Espresso",
                    "quantity": "2",
                    "base_price_money": { "amount": 350, "currency": "USD" },
                    "gross_return_money": { "amount": 700, "currency": "USD" }
                }
            ],
            "return_amounts": {
                "total_money": { "amount": 700, "currency": "USD" }
            }
        });

        let order_return = OrderReturn::new("order_abc", payload);
        let data = order_return.return_data().unwrap();

        assert_eq!(data.uid.as_deref(), Some("ret_1"));
        let lines = order_return.return_line_items().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, "2");
        assert_eq!(
            lines[0].gross_return_money.as_ref().unwrap().amount,
            Some(700)
        );
    }

    #[test]
    fn test_return_line_items_absent() {
        let order_return = OrderReturn::new("order_abc", json!({ "uid": "ret_2" }));
        assert!(order_return.return_line_items().unwrap().is_empty());
    }
}
