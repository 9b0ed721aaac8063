use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::Currency;

/// A merchant location known to Square
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: Option<i64>,
    pub name: String,
    /// Square's identifier for this location
    pub square_location_id: Option<String>,
    #[sqlx(try_from = "String")]
    pub currency: Currency,
    pub timezone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
