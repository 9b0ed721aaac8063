use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Where a custom field renders on the invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(30)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomFieldPlacement {
    AboveLineItems,
    BelowLineItems,
}

impl std::fmt::Display for CustomFieldPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomFieldPlacement::AboveLineItems => write!(f, "ABOVE_LINE_ITEMS"),
            CustomFieldPlacement::BelowLineItems => write!(f, "BELOW_LINE_ITEMS"),
        }
    }
}

/// A merchant-defined field rendered on the invoice
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceCustomField {
    pub id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub label: String,
    pub value: Option<String>,
    pub placement: Option<CustomFieldPlacement>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InvoiceCustomField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: None,
            invoice_id: None,
            label: label.into(),
            value: Some(value.into()),
            placement: None,
            created_at: None,
            updated_at: None,
        }
    }
}
