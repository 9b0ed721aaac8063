use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Money, Result};

use super::product::Product;

/// One line of an order: the order/product pivot row.
///
/// Quantity and the money fields are a point-in-time snapshot of the charge;
/// they are written when the order total is calculated and never recomputed
/// against later catalog price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub id: Option<i64>,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: u32,
    /// Per-line price override; required when the product is variable-priced
    pub price_override: Option<Money>,
    /// Square's uid for this line within its order
    pub square_uid: Option<String>,
    pub name: Option<String>,
    pub variation_name: Option<String>,
    pub catalog_object_id: Option<String>,
    pub catalog_version: Option<i64>,
    pub item_type: Option<String>,
    pub note: Option<String>,
    // Snapshotted money subtotals
    pub variation_total_price: Option<Money>,
    pub gross_sales: Option<Money>,
    pub total_tax: Option<Money>,
    pub total_discount: Option<Money>,
    pub total_service_charge: Option<Money>,
    pub total: Option<Money>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderLineItem {
    /// Create a new line item with validation
    pub fn new(
        order_id: i64,
        product_id: i64,
        quantity: u32,
        price_override: Option<Money>,
    ) -> Result<Self> {
        if quantity == 0 {
            return Err(AppError::validation("Quantity must be positive, got: 0"));
        }

        if let Some(price) = price_override {
            if price.amount < 0 {
                return Err(AppError::validation(format!(
                    "Price override must be non-negative, got: {}",
                    price.amount
                )));
            }
        }

        Ok(Self {
            id: None,
            order_id,
            product_id,
            quantity,
            price_override,
            square_uid: None,
            name: None,
            variation_name: None,
            catalog_object_id: None,
            catalog_version: None,
            item_type: None,
            note: None,
            variation_total_price: None,
            gross_sales: None,
            total_tax: None,
            total_discount: None,
            total_service_charge: None,
            total: None,
            created_at: None,
            updated_at: None,
        })
    }

    /// The unit price for this line: the override when present, else the
    /// product's current price. A variable-priced product without an
    /// override cannot be priced.
    pub fn unit_price(&self, product: &Product) -> Result<Money> {
        if let Some(price) = self.price_override {
            return Ok(price);
        }

        product.price.ok_or_else(|| {
            AppError::validation(format!(
                "Product \"{}\" has no price and the order line has no price override",
                product.name
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Currency;

    #[test]
    fn test_line_item_rejects_zero_quantity() {
        let result = OrderLineItem::new(1, 1, 0, None);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Quantity must be positive"));
    }

    #[test]
    fn test_unit_price_prefers_override() {
        let product = Product::new("Coffee", Some(Money::new(400, Currency::USD))).unwrap();
        let line =
            OrderLineItem::new(1, 1, 2, Some(Money::new(350, Currency::USD))).unwrap();
        assert_eq!(line.unit_price(&product).unwrap().amount, 350);
    }

    #[test]
    fn test_unit_price_variable_product_without_override() {
        let product = Product::new("Custom Cake", None).unwrap();
        let line = OrderLineItem::new(1, 1, 1, None).unwrap();
        assert!(line.unit_price(&product).is_err());
    }
}
