use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Money, Result};

/// A catalog product.
///
/// A product with no price uses variable pricing: every order line for it
/// must carry its own price override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub price: Option<Money>,
    pub variation_name: Option<String>,
    pub description: Option<String>,
    pub reference_id: Option<String>,
    pub square_catalog_object_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a new product with validation
    pub fn new(name: impl Into<String>, price: Option<Money>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("Product name cannot be empty"));
        }

        if let Some(price) = price {
            if price.amount < 0 {
                return Err(AppError::validation(format!(
                    "Product price must be non-negative, got: {}",
                    price.amount
                )));
            }
        }

        Ok(Self {
            id: None,
            name,
            price,
            variation_name: None,
            description: None,
            reference_id: None,
            square_catalog_object_id: None,
            created_at: None,
            updated_at: None,
        })
    }

    /// Whether this product requires a per-line price override
    pub fn is_variable_priced(&self) -> bool {
        self.price.is_none()
    }
}
