// MySQL persistence for order line items, fulfillment recipients, and the
// money snapshots written back after total calculation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;

use crate::core::{AppError, Currency, Money, Result};
use crate::modules::orders::models::{Address, Fulfillment, OrderLineItem, Product, Recipient};
use crate::modules::orders::services::recipient_builder::RecipientLookup;
use crate::modules::orders::services::totals::OrderTotals;

/// Repository for order-side persistence
pub struct OrderRepository {
    pool: MySqlPool,
}

#[derive(FromRow)]
struct LineItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: u32,
    price_override_amount: Option<i64>,
    price_override_currency: Option<String>,
    square_uid: Option<String>,
    name: Option<String>,
    variation_name: Option<String>,
    catalog_object_id: Option<String>,
    catalog_version: Option<i64>,
    item_type: Option<String>,
    note: Option<String>,
    variation_total_price_amount: Option<i64>,
    variation_total_price_currency: Option<String>,
    gross_sales_amount: Option<i64>,
    gross_sales_currency: Option<String>,
    total_tax_amount: Option<i64>,
    total_tax_currency: Option<String>,
    total_discount_amount: Option<i64>,
    total_discount_currency: Option<String>,
    total_service_charge_amount: Option<i64>,
    total_service_charge_currency: Option<String>,
    total_amount: Option<i64>,
    total_currency: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price_amount: Option<i64>,
    price_currency: Option<String>,
    variation_name: Option<String>,
    description: Option<String>,
    reference_id: Option<String>,
    square_catalog_object_id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct RecipientRow {
    id: i64,
    fulfillment_id: Option<i64>,
    customer_id: Option<i64>,
    display_name: Option<String>,
    email_address: Option<String>,
    phone_number: Option<String>,
    address_line_1: Option<String>,
    address_line_2: Option<String>,
    locality: Option<String>,
    administrative_district_level_1: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

pub(crate) fn money_from_pair(amount: Option<i64>, currency: Option<String>) -> Result<Option<Money>> {
    match (amount, currency) {
        (Some(amount), Some(currency)) => {
            let currency: Currency = currency
                .parse()
                .map_err(|e: String| AppError::validation(e))?;
            Ok(Some(Money::new(amount, currency)))
        }
        (None, _) => Ok(None),
        (Some(_), None) => Err(AppError::validation(
            "Money amount is missing its currency",
        )),
    }
}

impl TryFrom<LineItemRow> for OrderLineItem {
    type Error = AppError;

    fn try_from(row: LineItemRow) -> Result<Self> {
        Ok(OrderLineItem {
            id: Some(row.id),
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price_override: money_from_pair(
                row.price_override_amount,
                row.price_override_currency,
            )?,
            square_uid: row.square_uid,
            name: row.name,
            variation_name: row.variation_name,
            catalog_object_id: row.catalog_object_id,
            catalog_version: row.catalog_version,
            item_type: row.item_type,
            note: row.note,
            variation_total_price: money_from_pair(
                row.variation_total_price_amount,
                row.variation_total_price_currency,
            )?,
            gross_sales: money_from_pair(row.gross_sales_amount, row.gross_sales_currency)?,
            total_tax: money_from_pair(row.total_tax_amount, row.total_tax_currency)?,
            total_discount: money_from_pair(
                row.total_discount_amount,
                row.total_discount_currency,
            )?,
            total_service_charge: money_from_pair(
                row.total_service_charge_amount,
                row.total_service_charge_currency,
            )?,
            total: money_from_pair(row.total_amount, row.total_currency)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self> {
        Ok(Product {
            id: Some(row.id),
            name: row.name,
            price: money_from_pair(row.price_amount, row.price_currency)?,
            variation_name: row.variation_name,
            description: row.description,
            reference_id: row.reference_id,
            square_catalog_object_id: row.square_catalog_object_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<RecipientRow> for Recipient {
    fn from(row: RecipientRow) -> Self {
        let address = Address {
            address_line_1: row.address_line_1,
            address_line_2: row.address_line_2,
            locality: row.locality,
            administrative_district_level_1: row.administrative_district_level_1,
            postal_code: row.postal_code,
            country: row.country,
        };

        Recipient {
            id: Some(row.id),
            fulfillment_id: row.fulfillment_id,
            customer_id: row.customer_id,
            display_name: row.display_name,
            email_address: row.email_address,
            phone_number: row.phone_number,
            address: if address.is_empty() {
                None
            } else {
                Some(address)
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl OrderRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create_product(&self, product: &Product) -> Result<Product> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, price_amount, price_currency, variation_name, description,
                reference_id, square_catalog_object_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(product.price.map(|m| m.amount))
        .bind(product.price.map(|m| m.currency.to_string()))
        .bind(&product.variation_name)
        .bind(&product.description)
        .bind(&product.reference_id)
        .bind(&product.square_catalog_object_id)
        .execute(&self.pool)
        .await?;

        self.find_product(result.last_insert_id() as i64).await
    }

    pub async fn find_product(&self, id: i64) -> Result<Product> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;

        row.try_into()
    }

    /// Add a product to an order, creating the line item pivot row
    pub async fn add_line_item(&self, line: &OrderLineItem) -> Result<OrderLineItem> {
        let result = sqlx::query(
            r#"
            INSERT INTO order_line_items (
                order_id, product_id, quantity,
                price_override_amount, price_override_currency,
                square_uid, name, variation_name, catalog_object_id,
                catalog_version, item_type, note
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(line.order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.price_override.map(|m| m.amount))
        .bind(line.price_override.map(|m| m.currency.to_string()))
        .bind(&line.square_uid)
        .bind(&line.name)
        .bind(&line.variation_name)
        .bind(&line.catalog_object_id)
        .bind(line.catalog_version)
        .bind(&line.item_type)
        .bind(&line.note)
        .execute(&self.pool)
        .await?;

        self.find_line_item(result.last_insert_id() as i64).await
    }

    pub async fn find_line_item(&self, id: i64) -> Result<OrderLineItem> {
        let row = sqlx::query_as::<_, LineItemRow>("SELECT * FROM order_line_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order line item {}", id)))?;

        row.try_into()
    }

    pub async fn line_items(&self, order_id: i64) -> Result<Vec<OrderLineItem>> {
        let rows = sqlx::query_as::<_, LineItemRow>(
            "SELECT * FROM order_line_items WHERE order_id = ? ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderLineItem::try_from).collect()
    }

    /// Remove a line item and its deductible attachments.
    ///
    /// The pivot table is polymorphic, so its rows cannot cascade from a
    /// foreign key and are deleted here.
    pub async fn remove_line_item(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM deductibles WHERE featurable_kind = 'line_item' AND featurable_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM order_line_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Persist a fulfillment together with its recipient and pickup details
    pub async fn create_fulfillment(&self, fulfillment: &Fulfillment) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO fulfillments (order_id, fulfillment_type, state) VALUES (?, ?, ?)",
        )
        .bind(fulfillment.order_id)
        .bind(fulfillment.fulfillment_type)
        .bind(fulfillment.state)
        .execute(&self.pool)
        .await?;

        let fulfillment_id = result.last_insert_id() as i64;

        if let Some(recipient) = &fulfillment.recipient {
            self.create_recipient(Some(fulfillment_id), recipient).await?;
        }

        if let Some(pickup) = &fulfillment.pickup_details {
            sqlx::query(
                r#"
                INSERT INTO pickup_details (
                    fulfillment_id, schedule_type, pickup_at, expires_at, note
                ) VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(fulfillment_id)
            .bind(pickup.schedule_type)
            .bind(pickup.pickup_at)
            .bind(pickup.expires_at)
            .bind(&pickup.note)
            .execute(&self.pool)
            .await?;
        }

        Ok(fulfillment_id)
    }

    /// Delete a fulfillment; its recipient and pickup details go with it
    /// through the schema's cascade.
    pub async fn delete_fulfillment(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM fulfillments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Persist a recipient built by recipient resolution
    pub async fn create_recipient(
        &self,
        fulfillment_id: Option<i64>,
        recipient: &Recipient,
    ) -> Result<Recipient> {
        let address = recipient.address.clone().unwrap_or_default();

        let result = sqlx::query(
            r#"
            INSERT INTO recipients (
                fulfillment_id, customer_id, display_name, email_address, phone_number,
                address_line_1, address_line_2, locality,
                administrative_district_level_1, postal_code, country
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(fulfillment_id)
        .bind(recipient.customer_id)
        .bind(&recipient.display_name)
        .bind(&recipient.email_address)
        .bind(&recipient.phone_number)
        .bind(&address.address_line_1)
        .bind(&address.address_line_2)
        .bind(&address.locality)
        .bind(&address.administrative_district_level_1)
        .bind(&address.postal_code)
        .bind(&address.country)
        .execute(&self.pool)
        .await?;

        self.find_recipient(result.last_insert_id() as i64).await
    }

    pub async fn find_recipient(&self, id: i64) -> Result<Recipient> {
        let row = sqlx::query_as::<_, RecipientRow>("SELECT * FROM recipients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipient {}", id)))?;

        Ok(row.into())
    }

    /// Write the calculated money snapshots back onto the line item rows
    pub async fn save_line_totals(&self, totals: &OrderTotals) -> Result<()> {
        for lt in &totals.line_totals {
            let Some(id) = lt.line_item_id else {
                continue;
            };

            sqlx::query(
                r#"
                UPDATE order_line_items SET
                    gross_sales_amount = ?, gross_sales_currency = ?,
                    total_discount_amount = ?, total_discount_currency = ?,
                    total_tax_amount = ?, total_tax_currency = ?,
                    total_service_charge_amount = ?, total_service_charge_currency = ?,
                    total_amount = ?, total_currency = ?
                WHERE id = ?
                "#,
            )
            .bind(lt.gross_sales.amount)
            .bind(lt.gross_sales.currency.to_string())
            .bind(lt.total_discount.amount)
            .bind(lt.total_discount.currency.to_string())
            .bind(lt.total_tax.amount)
            .bind(lt.total_tax.currency.to_string())
            .bind(lt.total_service_charge.amount)
            .bind(lt.total_service_charge.currency.to_string())
            .bind(lt.total.amount)
            .bind(lt.total.currency.to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl RecipientLookup for OrderRepository {
    async fn find_by_customer_id(&self, customer_id: i64) -> Result<Option<Recipient>> {
        let row = sqlx::query_as::<_, RecipientRow>(
            "SELECT * FROM recipients WHERE customer_id = ? LIMIT 1",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Recipient::from))
    }

    async fn find_by_email(&self, email_address: &str) -> Result<Option<Recipient>> {
        let row = sqlx::query_as::<_, RecipientRow>(
            "SELECT * FROM recipients WHERE email_address = ? LIMIT 1",
        )
        .bind(email_address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Recipient::from))
    }
}
