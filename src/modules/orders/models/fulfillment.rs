use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::recipient::Recipient;

/// Fulfillment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentType {
    Pickup,
    Shipment,
    Delivery,
}

/// Fulfillment state as reported by Square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentState {
    Proposed,
    Reserved,
    Prepared,
    Completed,
    Canceled,
    Failed,
}

/// When a pickup is scheduled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    Asap,
    Scheduled,
}

/// Pickup details for a pickup fulfillment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupDetails {
    pub id: Option<i64>,
    pub fulfillment_id: Option<i64>,
    pub schedule_type: ScheduleType,
    pub pickup_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl PickupDetails {
    pub fn asap() -> Self {
        Self {
            id: None,
            fulfillment_id: None,
            schedule_type: ScheduleType::Asap,
            pickup_at: None,
            expires_at: None,
            note: None,
        }
    }

    pub fn scheduled(pickup_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            fulfillment_id: None,
            schedule_type: ScheduleType::Scheduled,
            pickup_at: Some(pickup_at),
            expires_at: None,
            note: None,
        }
    }
}

/// An order's fulfillment, with its recipient and optional pickup details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fulfillment {
    pub id: Option<i64>,
    pub order_id: i64,
    pub fulfillment_type: FulfillmentType,
    pub state: FulfillmentState,
    pub recipient: Option<Recipient>,
    pub pickup_details: Option<PickupDetails>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
