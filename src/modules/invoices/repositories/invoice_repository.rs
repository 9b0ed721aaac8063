// MySQL persistence for invoices and their five child tables.
//
// The invoice's order reference lives in the host application's tables, so
// aggregate assembly takes the host-supplied OrderRef rather than loading an
// order here.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;

use crate::core::{AppError, Currency, Money, Result};
use crate::modules::invoices::models::{
    DeliveryMethod, Invoice, InvoiceAcceptedPaymentMethods, InvoiceAggregate, InvoiceAttachment,
    InvoiceCustomField, InvoicePaymentRequest, InvoiceRecipient, InvoiceStatus, PaymentRequestType,
};
use crate::modules::orders::models::{Location, OrderRef};
use crate::modules::square::models::SquareInvoiceAttachment;

/// Repository for invoice aggregates
pub struct InvoiceRepository {
    pool: MySqlPool,
}

#[derive(FromRow)]
struct InvoiceRow {
    id: i64,
    order_id: i64,
    location_id: i64,
    payment_service_id: Option<String>,
    payment_service_version: Option<i64>,
    invoice_number: Option<String>,
    title: Option<String>,
    description: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
    public_url: Option<String>,
    status: InvoiceStatus,
    delivery_method: Option<DeliveryMethod>,
    timezone: Option<String>,
    sale_or_service_date: Option<NaiveDate>,
    payment_conditions: Option<String>,
    store_payment_method_enabled: bool,
    next_payment_amount: Option<i64>,
    next_payment_currency: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct PaymentRequestRow {
    id: i64,
    invoice_id: i64,
    square_uid: Option<String>,
    request_type: Option<PaymentRequestType>,
    due_date: Option<NaiveDate>,
    tipping_enabled: Option<bool>,
    automatic_payment_source: Option<String>,
    fixed_amount_requested: Option<i64>,
    fixed_amount_currency: Option<String>,
    percentage_requested: Option<Decimal>,
    computed_amount: Option<i64>,
    computed_currency: Option<String>,
    total_completed_amount: Option<i64>,
    total_completed_currency: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

fn money_from_pair(amount: Option<i64>, currency: Option<String>) -> Result<Option<Money>> {
    match (amount, currency) {
        (Some(amount), Some(currency)) => {
            let currency: Currency = currency
                .parse()
                .map_err(|e: String| AppError::validation(e))?;
            Ok(Some(Money::new(amount, currency)))
        }
        (None, _) => Ok(None),
        (Some(_), None) => Err(AppError::validation("Money amount is missing its currency")),
    }
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = AppError;

    fn try_from(row: InvoiceRow) -> Result<Self> {
        Ok(Invoice {
            id: Some(row.id),
            order_id: row.order_id,
            location_id: row.location_id,
            payment_service_id: row.payment_service_id,
            payment_service_version: row.payment_service_version,
            invoice_number: row.invoice_number,
            title: row.title,
            description: row.description,
            scheduled_at: row.scheduled_at,
            public_url: row.public_url,
            status: row.status,
            delivery_method: row.delivery_method,
            timezone: row.timezone,
            sale_or_service_date: row.sale_or_service_date,
            payment_conditions: row.payment_conditions,
            store_payment_method_enabled: row.store_payment_method_enabled,
            next_payment_amount: money_from_pair(
                row.next_payment_amount,
                row.next_payment_currency,
            )?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<PaymentRequestRow> for InvoicePaymentRequest {
    type Error = AppError;

    fn try_from(row: PaymentRequestRow) -> Result<Self> {
        Ok(InvoicePaymentRequest {
            id: Some(row.id),
            invoice_id: Some(row.invoice_id),
            square_uid: row.square_uid,
            request_type: row.request_type,
            due_date: row.due_date,
            tipping_enabled: row.tipping_enabled,
            automatic_payment_source: row.automatic_payment_source,
            fixed_amount_requested: money_from_pair(
                row.fixed_amount_requested,
                row.fixed_amount_currency,
            )?,
            percentage_requested: row.percentage_requested,
            computed_amount: money_from_pair(row.computed_amount, row.computed_currency)?,
            total_completed_amount: money_from_pair(
                row.total_completed_amount,
                row.total_completed_currency,
            )?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl InvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, invoice: &Invoice) -> Result<Invoice> {
        let result = sqlx::query(
            r#"
            INSERT INTO invoices (
                order_id, location_id, payment_service_id, payment_service_version,
                invoice_number, title, description, scheduled_at, public_url, status,
                delivery_method, timezone, sale_or_service_date, payment_conditions,
                store_payment_method_enabled, next_payment_amount, next_payment_currency
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invoice.order_id)
        .bind(invoice.location_id)
        .bind(&invoice.payment_service_id)
        .bind(invoice.payment_service_version)
        .bind(&invoice.invoice_number)
        .bind(&invoice.title)
        .bind(&invoice.description)
        .bind(invoice.scheduled_at)
        .bind(&invoice.public_url)
        .bind(invoice.status)
        .bind(invoice.delivery_method)
        .bind(&invoice.timezone)
        .bind(invoice.sale_or_service_date)
        .bind(&invoice.payment_conditions)
        .bind(invoice.store_payment_method_enabled)
        .bind(invoice.next_payment_amount.map(|m| m.amount))
        .bind(invoice.next_payment_amount.map(|m| m.currency.to_string()))
        .execute(&self.pool)
        .await?;

        self.find(result.last_insert_id() as i64).await
    }

    pub async fn find(&self, id: i64) -> Result<Invoice> {
        let row = sqlx::query_as::<_, InvoiceRow>("SELECT * FROM invoices WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {}", id)))?;

        row.try_into()
    }

    pub async fn find_by_order(&self, order_id: i64) -> Result<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>("SELECT * FROM invoices WHERE order_id = ?")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Invoice::try_from).transpose()
    }

    /// Persist fields synced from a Square response
    pub async fn update(&self, invoice: &Invoice) -> Result<()> {
        let id = invoice
            .id
            .ok_or_else(|| AppError::validation("Cannot update an unsaved invoice"))?;

        sqlx::query(
            r#"
            UPDATE invoices SET
                payment_service_id = ?, payment_service_version = ?, invoice_number = ?,
                title = ?, description = ?, scheduled_at = ?, public_url = ?, status = ?,
                delivery_method = ?, timezone = ?, sale_or_service_date = ?,
                payment_conditions = ?, store_payment_method_enabled = ?,
                next_payment_amount = ?, next_payment_currency = ?
            WHERE id = ?
            "#,
        )
        .bind(&invoice.payment_service_id)
        .bind(invoice.payment_service_version)
        .bind(&invoice.invoice_number)
        .bind(&invoice.title)
        .bind(&invoice.description)
        .bind(invoice.scheduled_at)
        .bind(&invoice.public_url)
        .bind(invoice.status)
        .bind(invoice.delivery_method)
        .bind(&invoice.timezone)
        .bind(invoice.sale_or_service_date)
        .bind(&invoice.payment_conditions)
        .bind(invoice.store_payment_method_enabled)
        .bind(invoice.next_payment_amount.map(|m| m.amount))
        .bind(invoice.next_payment_amount.map(|m| m.currency.to_string()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Load an invoice and its children, pairing them with the host-supplied
    /// order reference.
    pub async fn load_aggregate(&self, id: i64, order: OrderRef) -> Result<InvoiceAggregate> {
        let invoice = self.find(id).await?;

        let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = ?")
            .bind(invoice.location_id)
            .fetch_optional(&self.pool)
            .await?;

        let recipient = sqlx::query_as::<_, InvoiceRecipient>(
            "SELECT * FROM invoice_recipients WHERE invoice_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let payment_requests = sqlx::query_as::<_, PaymentRequestRow>(
            "SELECT * FROM invoice_payment_requests WHERE invoice_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(InvoicePaymentRequest::try_from)
        .collect::<Result<Vec<_>>>()?;

        let accepted_payment_methods = sqlx::query_as::<_, InvoiceAcceptedPaymentMethods>(
            "SELECT * FROM invoice_accepted_payment_methods WHERE invoice_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let custom_fields = sqlx::query_as::<_, InvoiceCustomField>(
            "SELECT * FROM invoice_custom_fields WHERE invoice_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let attachments = sqlx::query_as::<_, InvoiceAttachment>(
            "SELECT * FROM invoice_attachments WHERE invoice_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(InvoiceAggregate {
            invoice,
            order: Some(order),
            location,
            recipient,
            payment_requests,
            accepted_payment_methods,
            custom_fields,
            attachments,
        })
    }

    pub async fn set_recipient(&self, invoice_id: i64, recipient: &InvoiceRecipient) -> Result<()> {
        sqlx::query("DELETE FROM invoice_recipients WHERE invoice_id = ?")
            .bind(invoice_id)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO invoice_recipients (
                invoice_id, customer_id, customer_square_id, given_name, family_name,
                email_address, phone_number, company_name, address_line_1, address_line_2,
                locality, administrative_district_level_1, postal_code, country
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invoice_id)
        .bind(recipient.customer_id)
        .bind(&recipient.customer_square_id)
        .bind(&recipient.given_name)
        .bind(&recipient.family_name)
        .bind(&recipient.email_address)
        .bind(&recipient.phone_number)
        .bind(&recipient.company_name)
        .bind(&recipient.address_line_1)
        .bind(&recipient.address_line_2)
        .bind(&recipient.locality)
        .bind(&recipient.administrative_district_level_1)
        .bind(&recipient.postal_code)
        .bind(&recipient.country)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn add_payment_request(
        &self,
        invoice_id: i64,
        request: &InvoicePaymentRequest,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invoice_payment_requests (
                invoice_id, square_uid, request_type, due_date, tipping_enabled,
                automatic_payment_source, fixed_amount_requested, fixed_amount_currency,
                percentage_requested
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invoice_id)
        .bind(&request.square_uid)
        .bind(request.request_type)
        .bind(request.due_date)
        .bind(request.tipping_enabled)
        .bind(&request.automatic_payment_source)
        .bind(request.fixed_amount_requested.map(|m| m.amount))
        .bind(request.fixed_amount_requested.map(|m| m.currency.to_string()))
        .bind(request.percentage_requested)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_accepted_payment_methods(
        &self,
        invoice_id: i64,
        methods: &InvoiceAcceptedPaymentMethods,
    ) -> Result<()> {
        sqlx::query("DELETE FROM invoice_accepted_payment_methods WHERE invoice_id = ?")
            .bind(invoice_id)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO invoice_accepted_payment_methods (
                invoice_id, card, square_gift_card, bank_account, buy_now_pay_later, cash_app_pay
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invoice_id)
        .bind(methods.card)
        .bind(methods.square_gift_card)
        .bind(methods.bank_account)
        .bind(methods.buy_now_pay_later)
        .bind(methods.cash_app_pay)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replace the local mirror of Square-reported attachment metadata.
    ///
    /// Attachments are uploaded outside this crate; the local rows only ever
    /// reflect what Square's invoice responses report.
    pub async fn replace_attachments(
        &self,
        invoice_id: i64,
        attachments: &[SquareInvoiceAttachment],
    ) -> Result<()> {
        sqlx::query("DELETE FROM invoice_attachments WHERE invoice_id = ?")
            .bind(invoice_id)
            .execute(&self.pool)
            .await?;

        for attachment in attachments {
            let Some(square_attachment_id) = attachment.id.as_deref() else {
                continue;
            };

            let uploaded_at = attachment
                .uploaded_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc));

            sqlx::query(
                r#"
                INSERT INTO invoice_attachments (
                    invoice_id, square_attachment_id, filename, description,
                    filesize, hash, mime_type, uploaded_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(invoice_id)
            .bind(square_attachment_id)
            .bind(&attachment.filename)
            .bind(&attachment.description)
            .bind(attachment.filesize)
            .bind(&attachment.hash)
            .bind(&attachment.mime_type)
            .bind(uploaded_at)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    pub async fn add_custom_field(&self, invoice_id: i64, field: &InvoiceCustomField) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invoice_custom_fields (invoice_id, label, value, placement)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(invoice_id)
        .bind(&field.label)
        .bind(&field.value)
        .bind(field.placement)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
