use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

use super::rate::DeductibleRate;

/// Whether a tax is added on top of an amount or already baked into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxInclusionType {
    Additive,
    Inclusive,
}

impl Default for TaxInclusionType {
    fn default() -> Self {
        TaxInclusionType::Additive
    }
}

/// A tax that can be attached to an order or a line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tax {
    pub id: Option<i64>,
    pub name: String,
    pub rate: DeductibleRate,
    pub inclusion_type: TaxInclusionType,
    pub applies_to_custom_amounts: bool,
    pub enabled: bool,
    pub reference_id: Option<String>,
    pub square_catalog_object_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Tax {
    /// Create a new tax with validation
    pub fn new(name: impl Into<String>, rate: DeductibleRate) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("Tax name cannot be empty"));
        }

        Ok(Self {
            id: None,
            name,
            rate,
            inclusion_type: TaxInclusionType::default(),
            applies_to_custom_amounts: false,
            enabled: true,
            reference_id: None,
            square_catalog_object_id: None,
            created_at: None,
            updated_at: None,
        })
    }
}
