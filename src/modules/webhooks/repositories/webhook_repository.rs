use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::webhooks::models::{WebhookEvent, WebhookEventStatus};

/// Repository for the append-only webhook event log
pub struct WebhookRepository {
    pool: MySqlPool,
}

#[derive(FromRow)]
struct WebhookEventRow {
    id: i64,
    square_event_id: String,
    event_type: String,
    event_data: serde_json::Value,
    event_time: Option<DateTime<Utc>>,
    status: WebhookEventStatus,
    processed_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
    retry_reason: Option<String>,
    retry_number: Option<u32>,
    initial_delivery_timestamp: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<WebhookEventRow> for WebhookEvent {
    fn from(row: WebhookEventRow) -> Self {
        WebhookEvent {
            id: Some(row.id),
            square_event_id: row.square_event_id,
            event_type: row.event_type,
            event_data: row.event_data,
            event_time: row.event_time,
            status: row.status,
            processed_at: row.processed_at,
            error_message: row.error_message,
            retry_reason: row.retry_reason,
            retry_number: row.retry_number,
            initial_delivery_timestamp: row.initial_delivery_timestamp,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl WebhookRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Record an inbound delivery.
    ///
    /// Square redelivers events, so the event id is unique-keyed; a
    /// redelivery of an already-recorded event returns the stored row
    /// instead of inserting a duplicate.
    pub async fn record(&self, event: &WebhookEvent) -> Result<WebhookEvent> {
        let insert = sqlx::query(
            r#"
            INSERT INTO webhook_events (
                square_event_id, event_type, event_data, event_time, status,
                retry_reason, retry_number, initial_delivery_timestamp
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.square_event_id)
        .bind(&event.event_type)
        .bind(&event.event_data)
        .bind(event.event_time)
        .bind(event.status)
        .bind(&event.retry_reason)
        .bind(event.retry_number)
        .bind(event.initial_delivery_timestamp)
        .execute(&self.pool)
        .await;

        match insert {
            Ok(result) => self.find(result.last_insert_id() as i64).await,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                info!(
                    square_event_id = %event.square_event_id,
                    "Webhook event already recorded, returning existing row"
                );
                self.find_by_square_event_id(&event.square_event_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found(format!("Webhook event {}", event.square_event_id))
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find(&self, id: i64) -> Result<WebhookEvent> {
        let row = sqlx::query_as::<_, WebhookEventRow>("SELECT * FROM webhook_events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Webhook event {}", id)))?;

        Ok(row.into())
    }

    pub async fn find_by_square_event_id(
        &self,
        square_event_id: &str,
    ) -> Result<Option<WebhookEvent>> {
        let row = sqlx::query_as::<_, WebhookEventRow>(
            "SELECT * FROM webhook_events WHERE square_event_id = ?",
        )
        .bind(square_event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(WebhookEvent::from))
    }

    pub async fn pending(&self) -> Result<Vec<WebhookEvent>> {
        let rows = sqlx::query_as::<_, WebhookEventRow>(
            "SELECT * FROM webhook_events WHERE status = 'pending' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(WebhookEvent::from).collect())
    }

    /// Persist the in-memory status transition of a processed/failed event
    pub async fn save_status(&self, event: &WebhookEvent) -> Result<()> {
        let id = event
            .id
            .ok_or_else(|| AppError::validation("Cannot update an unsaved webhook event"))?;

        sqlx::query(
            "UPDATE webhook_events SET status = ?, processed_at = ?, error_message = ? WHERE id = ?",
        )
        .bind(event.status)
        .bind(event.processed_at)
        .bind(&event.error_message)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
