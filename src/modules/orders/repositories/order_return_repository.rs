use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;
use tracing::warn;

use crate::core::{AppError, Result};
use crate::modules::orders::models::{OrderReturn, OrderReturnLineItem};
use crate::modules::square::models::SquareMoney;

use super::order_repository::money_from_pair;

/// Repository for Square-reported order returns
pub struct OrderReturnRepository {
    pool: MySqlPool,
}

#[derive(FromRow)]
struct OrderReturnRow {
    id: i64,
    order_id: Option<i64>,
    source_order_id: String,
    data: serde_json::Value,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct ReturnLineItemRow {
    id: i64,
    order_return_id: i64,
    product_id: Option<i64>,
    quantity: u32,
    square_uid: Option<String>,
    source_line_item_uid: Option<String>,
    catalog_object_id: Option<String>,
    catalog_version: Option<i64>,
    name: Option<String>,
    variation_name: Option<String>,
    item_type: Option<String>,
    note: Option<String>,
    base_price_amount: Option<i64>,
    base_price_currency: Option<String>,
    variation_total_price_amount: Option<i64>,
    variation_total_price_currency: Option<String>,
    gross_return_amount: Option<i64>,
    gross_return_currency: Option<String>,
    total_discount_amount: Option<i64>,
    total_discount_currency: Option<String>,
    total_amount: Option<i64>,
    total_currency: Option<String>,
    total_service_charge_amount: Option<i64>,
    total_service_charge_currency: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReturnLineItemRow> for OrderReturnLineItem {
    type Error = AppError;

    fn try_from(row: ReturnLineItemRow) -> Result<Self> {
        Ok(OrderReturnLineItem {
            id: Some(row.id),
            order_return_id: row.order_return_id,
            product_id: row.product_id,
            quantity: row.quantity,
            square_uid: row.square_uid,
            source_line_item_uid: row.source_line_item_uid,
            catalog_object_id: row.catalog_object_id,
            catalog_version: row.catalog_version,
            name: row.name,
            variation_name: row.variation_name,
            item_type: row.item_type,
            note: row.note,
            base_price: money_from_pair(row.base_price_amount, row.base_price_currency)?,
            variation_total_price: money_from_pair(
                row.variation_total_price_amount,
                row.variation_total_price_currency,
            )?,
            gross_return: money_from_pair(row.gross_return_amount, row.gross_return_currency)?,
            total_discount: money_from_pair(
                row.total_discount_amount,
                row.total_discount_currency,
            )?,
            total: money_from_pair(row.total_amount, row.total_currency)?,
            total_service_charge: money_from_pair(
                row.total_service_charge_amount,
                row.total_service_charge_currency,
            )?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn pair(money: &Option<SquareMoney>) -> (Option<i64>, Option<String>) {
    match money {
        Some(m) => (m.amount, m.currency.clone()),
        None => (None, None),
    }
}

impl OrderReturnRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Store a Square-reported return and its line items.
    ///
    /// Line quantities arrive as strings on the wire; a line whose quantity
    /// does not parse is skipped with a warning rather than poisoning the
    /// whole return.
    pub async fn create(&self, order_return: &OrderReturn) -> Result<OrderReturn> {
        let result = sqlx::query(
            "INSERT INTO order_returns (order_id, source_order_id, data) VALUES (?, ?, ?)",
        )
        .bind(order_return.order_id)
        .bind(&order_return.source_order_id)
        .bind(&order_return.data)
        .execute(&self.pool)
        .await?;

        let return_id = result.last_insert_id() as i64;

        for wire_line in order_return.return_line_items()? {
            let quantity: u32 = match wire_line.quantity.parse() {
                Ok(q) => q,
                Err(_) => {
                    warn!(
                        source_order_id = %order_return.source_order_id,
                        quantity = %wire_line.quantity,
                        "Skipping return line item with non-integer quantity"
                    );
                    continue;
                }
            };

            let (base_amount, base_currency) = pair(&wire_line.base_price_money);
            let (var_amount, var_currency) = pair(&wire_line.variation_total_price_money);
            let (gross_amount, gross_currency) = pair(&wire_line.gross_return_money);
            let (disc_amount, disc_currency) = pair(&wire_line.total_discount_money);
            let (total_amount, total_currency) = pair(&wire_line.total_money);
            let (charge_amount, charge_currency) = pair(&wire_line.total_service_charge_money);

            sqlx::query(
                r#"
                INSERT INTO order_return_line_items (
                    order_return_id, quantity, square_uid, source_line_item_uid,
                    catalog_object_id, catalog_version, name, variation_name,
                    item_type, note,
                    base_price_amount, base_price_currency,
                    variation_total_price_amount, variation_total_price_currency,
                    gross_return_amount, gross_return_currency,
                    total_discount_amount, total_discount_currency,
                    total_amount, total_currency,
                    total_service_charge_amount, total_service_charge_currency
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(return_id)
            .bind(quantity)
            .bind(&wire_line.uid)
            .bind(&wire_line.source_line_item_uid)
            .bind(&wire_line.catalog_object_id)
            .bind(wire_line.catalog_version)
            .bind(&wire_line.name)
            .bind(&wire_line.variation_name)
            .bind(&wire_line.item_type)
            .bind(&wire_line.note)
            .bind(base_amount)
            .bind(base_currency)
            .bind(var_amount)
            .bind(var_currency)
            .bind(gross_amount)
            .bind(gross_currency)
            .bind(disc_amount)
            .bind(disc_currency)
            .bind(total_amount)
            .bind(total_currency)
            .bind(charge_amount)
            .bind(charge_currency)
            .execute(&self.pool)
            .await?;
        }

        self.find(return_id).await
    }

    pub async fn find(&self, id: i64) -> Result<OrderReturn> {
        let row = sqlx::query_as::<_, OrderReturnRow>("SELECT * FROM order_returns WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order return {}", id)))?;

        Ok(OrderReturn {
            id: Some(row.id),
            order_id: row.order_id,
            source_order_id: row.source_order_id,
            data: row.data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    pub async fn find_by_source_order_id(&self, source_order_id: &str) -> Result<Vec<OrderReturn>> {
        let rows = sqlx::query_as::<_, OrderReturnRow>(
            "SELECT * FROM order_returns WHERE source_order_id = ? ORDER BY id",
        )
        .bind(source_order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| OrderReturn {
                id: Some(row.id),
                order_id: row.order_id,
                source_order_id: row.source_order_id,
                data: row.data,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }

    pub async fn line_items(&self, order_return_id: i64) -> Result<Vec<OrderReturnLineItem>> {
        let rows = sqlx::query_as::<_, ReturnLineItemRow>(
            "SELECT * FROM order_return_line_items WHERE order_return_id = ? ORDER BY id",
        )
        .bind(order_return_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderReturnLineItem::try_from).collect()
    }
}
