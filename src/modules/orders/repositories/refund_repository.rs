use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;

use crate::core::{AppError, Result};
use crate::modules::deductibles::models::FeaturableKind;
use crate::modules::orders::models::{Refund, RefundStatus, RefundTarget};

/// Repository for refunds against orders and order lines
pub struct RefundRepository {
    pool: MySqlPool,
}

#[derive(FromRow)]
struct RefundRow {
    id: i64,
    refundable_kind: FeaturableKind,
    refundable_id: i64,
    quantity: u32,
    reason: Option<String>,
    status: RefundStatus,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<RefundRow> for Refund {
    fn from(row: RefundRow) -> Self {
        let target = match row.refundable_kind {
            FeaturableKind::Order => RefundTarget::Order(row.refundable_id),
            FeaturableKind::LineItem => RefundTarget::LineItem(row.refundable_id),
        };

        Refund {
            id: Some(row.id),
            target,
            quantity: row.quantity,
            reason: row.reason,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl RefundRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Persist a refund, first checking its quantity against the purchased
    /// quantity of the targeted line item.
    pub async fn create(&self, refund: &Refund) -> Result<Refund> {
        if let RefundTarget::LineItem(line_item_id) = refund.target {
            let purchased: Option<u32> = sqlx::query_scalar(
                "SELECT quantity FROM order_line_items WHERE id = ?",
            )
            .bind(line_item_id)
            .fetch_optional(&self.pool)
            .await?;

            let purchased = purchased.ok_or_else(|| {
                AppError::not_found(format!("Order line item {}", line_item_id))
            })?;

            refund.check_refund_quantity(purchased)?;
        }

        let featurable = refund.target.as_featurable();
        let result = sqlx::query(
            r#"
            INSERT INTO refunds (refundable_kind, refundable_id, quantity, reason, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(featurable.kind)
        .bind(featurable.id)
        .bind(refund.quantity)
        .bind(&refund.reason)
        .bind(refund.status)
        .execute(&self.pool)
        .await?;

        self.find(result.last_insert_id() as i64).await
    }

    pub async fn find(&self, id: i64) -> Result<Refund> {
        let row = sqlx::query_as::<_, RefundRow>("SELECT * FROM refunds WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Refund {}", id)))?;

        Ok(row.into())
    }

    pub async fn list_for(&self, target: RefundTarget) -> Result<Vec<Refund>> {
        let featurable = target.as_featurable();
        let rows = sqlx::query_as::<_, RefundRow>(
            "SELECT * FROM refunds WHERE refundable_kind = ? AND refundable_id = ? ORDER BY id",
        )
        .bind(featurable.kind)
        .bind(featurable.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Refund::from).collect())
    }
}
