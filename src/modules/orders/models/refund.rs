use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::deductibles::models::{FeaturableKind, FeaturableRef};

/// What a refund is issued against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RefundTarget {
    /// The whole order
    Order(i64),
    /// A specific order line
    LineItem(i64),
}

impl RefundTarget {
    pub fn as_featurable(&self) -> FeaturableRef {
        match self {
            RefundTarget::Order(id) => FeaturableRef {
                kind: FeaturableKind::Order,
                id: *id,
            },
            RefundTarget::LineItem(id) => FeaturableRef {
                kind: FeaturableKind::LineItem,
                id: *id,
            },
        }
    }
}

/// Refund status as reported by Square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundStatus {
    Pending,
    Approved,
    Completed,
    Rejected,
    Failed,
}

impl Default for RefundStatus {
    fn default() -> Self {
        RefundStatus::Pending
    }
}

/// A refund request against an order or one of its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub id: Option<i64>,
    pub target: RefundTarget,
    pub quantity: u32,
    pub reason: Option<String>,
    pub status: RefundStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Refund {
    pub fn new(target: RefundTarget, quantity: u32, reason: Option<String>) -> Result<Self> {
        if quantity == 0 {
            return Err(AppError::validation(
                "Refund quantity must be positive, got: 0",
            ));
        }

        Ok(Self {
            id: None,
            target,
            quantity,
            reason,
            status: RefundStatus::default(),
            created_at: None,
            updated_at: None,
        })
    }

    /// Check that a line-item refund does not exceed the quantity that was
    /// purchased. Runs synchronously before persistence.
    pub fn check_refund_quantity(&self, purchased_quantity: u32) -> Result<()> {
        if matches!(self.target, RefundTarget::LineItem(_)) && self.quantity > purchased_quantity {
            return Err(AppError::quantity_exceeded(
                "Refund quantity exceeds product quantity",
            ));
        }

        Ok(())
    }
}
