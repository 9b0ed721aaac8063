use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

use super::rate::DeductibleRate;

/// A discount that can be attached to an order or a line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount {
    pub id: Option<i64>,
    pub name: String,
    pub rate: DeductibleRate,
    pub enabled: bool,
    pub reference_id: Option<String>,
    pub square_catalog_object_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Discount {
    /// Create a new discount with validation
    pub fn new(name: impl Into<String>, rate: DeductibleRate) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("Discount name cannot be empty"));
        }

        Ok(Self {
            id: None,
            name,
            rate,
            enabled: true,
            reference_id: None,
            square_catalog_object_id: None,
            created_at: None,
            updated_at: None,
        })
    }
}
