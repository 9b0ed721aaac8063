use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Metadata for a file Square has attached to an invoice.
///
/// Read-only mirror of Square-reported data; uploads happen outside this
/// crate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceAttachment {
    pub id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub square_attachment_id: String,
    pub filename: Option<String>,
    pub description: Option<String>,
    pub filesize: Option<i64>,
    pub hash: Option<String>,
    pub mime_type: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
