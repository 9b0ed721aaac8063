// Mapping between local invoice aggregates and Square's invoice request
// shapes, plus the reverse sync from Square responses onto local state.
//
// Every precondition is checked here, before any network-shaped object is
// constructed, so a missing relationship never surfaces as a raw Square
// error.

use uuid::Uuid;

use crate::core::{AppError, Currency, Money, Result};
use crate::modules::invoices::models::{
    Invoice, InvoiceAcceptedPaymentMethods, InvoiceAggregate, InvoiceCustomField,
    InvoicePaymentRequest, InvoiceRecipient,
};
use crate::modules::square::models::{
    CreateInvoiceRequest, PublishInvoiceRequest, SquareAddress, SquareInvoice,
    SquareInvoiceAcceptedPaymentMethods, SquareInvoiceCustomField, SquareInvoicePaymentRequest,
    SquareInvoiceRecipient, SquareMoney, UpdateInvoiceRequest,
};

/// Builds Square invoice requests from local aggregates
pub struct InvoiceBuilder;

impl InvoiceBuilder {
    /// Build a CreateInvoiceRequest for the Square API.
    ///
    /// A fresh idempotency key is generated per call; repeated calls for the
    /// same logical invoice are not idempotent at this layer, and callers
    /// that retry must supply their own idempotency strategy.
    pub fn build_create_invoice_request(
        aggregate: &InvoiceAggregate,
    ) -> Result<CreateInvoiceRequest> {
        let invoice = Self::build_invoice(aggregate, None)?;

        Ok(CreateInvoiceRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            invoice,
        })
    }

    /// Build an UpdateInvoiceRequest for the Square API
    pub fn build_update_invoice_request(
        aggregate: &InvoiceAggregate,
        version: i64,
    ) -> Result<UpdateInvoiceRequest> {
        let invoice = Self::build_invoice(aggregate, Some(version))?;

        Ok(UpdateInvoiceRequest {
            idempotency_key: Uuid::new_v4().to_string(),
            invoice,
            fields_to_clear: None,
        })
    }

    /// Build a PublishInvoiceRequest for the Square API
    pub fn build_publish_invoice_request(version: i64) -> PublishInvoiceRequest {
        PublishInvoiceRequest {
            version,
            idempotency_key: Uuid::new_v4().to_string(),
        }
    }

    fn build_invoice(aggregate: &InvoiceAggregate, version: Option<i64>) -> Result<SquareInvoice> {
        let order = aggregate.order.as_ref().ok_or_else(|| {
            AppError::missing_property("Cannot create invoice without an associated order")
        })?;

        let order_square_id = order.square_order_id.as_deref().ok_or_else(|| {
            AppError::missing_property("Cannot create invoice without a Square order ID")
        })?;

        let location_square_id = aggregate
            .location
            .as_ref()
            .and_then(|location| location.square_location_id.as_deref())
            .ok_or_else(|| {
                AppError::missing_property("Cannot create invoice without a Square location ID")
            })?;

        if aggregate.payment_requests.is_empty() {
            return Err(AppError::missing_property(
                "Cannot create invoice without at least one payment request",
            ));
        }

        let payment_requests = aggregate
            .payment_requests
            .iter()
            .map(Self::build_payment_request)
            .collect::<Result<Vec<_>>>()?;

        let accepted_payment_methods = aggregate
            .accepted_payment_methods
            .as_ref()
            .map(Self::build_accepted_payment_methods)
            .ok_or_else(|| {
                AppError::missing_property("Cannot create invoice without accepted payment methods")
            })?;

        let local = &aggregate.invoice;

        Ok(SquareInvoice {
            id: None,
            version,
            location_id: Some(location_square_id.to_string()),
            order_id: Some(order_square_id.to_string()),
            invoice_number: local.invoice_number.clone(),
            title: local.title.clone(),
            description: local.description.clone(),
            scheduled_at: local.scheduled_at.map(|dt| dt.to_rfc3339()),
            public_url: None,
            status: None,
            delivery_method: local.delivery_method.map(|m| m.to_string()),
            timezone: local.timezone.clone(),
            sale_or_service_date: local
                .sale_or_service_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            payment_conditions: local.payment_conditions.clone(),
            store_payment_method_enabled: local
                .store_payment_method_enabled
                .then_some(true),
            primary_recipient: aggregate.recipient.as_ref().map(Self::build_recipient),
            payment_requests: Some(payment_requests),
            accepted_payment_methods: Some(accepted_payment_methods),
            custom_fields: if aggregate.custom_fields.is_empty() {
                None
            } else {
                Some(
                    aggregate
                        .custom_fields
                        .iter()
                        .map(Self::build_custom_field)
                        .collect(),
                )
            },
            attachments: None,
            next_payment_amount_money: None,
            created_at: None,
            updated_at: None,
        })
    }

    fn build_recipient(recipient: &InvoiceRecipient) -> SquareInvoiceRecipient {
        let address = if recipient.has_address() {
            Some(SquareAddress {
                address_line_1: recipient.address_line_1.clone(),
                address_line_2: recipient.address_line_2.clone(),
                locality: recipient.locality.clone(),
                administrative_district_level_1: recipient
                    .administrative_district_level_1
                    .clone(),
                postal_code: recipient.postal_code.clone(),
                country: recipient.country.clone(),
            })
        } else {
            None
        };

        SquareInvoiceRecipient {
            customer_id: recipient.customer_square_id.clone(),
            given_name: recipient.given_name.clone(),
            family_name: recipient.family_name.clone(),
            email_address: recipient.email_address.clone(),
            phone_number: recipient.phone_number.clone(),
            company_name: recipient.company_name.clone(),
            address,
        }
    }

    fn build_payment_request(request: &InvoicePaymentRequest) -> Result<SquareInvoicePaymentRequest> {
        let request_type = request.request_type.ok_or_else(|| {
            AppError::missing_property("Payment request is missing required field: request_type")
        })?;

        let due_date = request.due_date.ok_or_else(|| {
            AppError::missing_property("Payment request is missing required field: due_date")
        })?;

        Ok(SquareInvoicePaymentRequest {
            uid: request.square_uid.clone(),
            request_type: Some(request_type.to_string()),
            due_date: Some(due_date.format("%Y-%m-%d").to_string()),
            tipping_enabled: request.tipping_enabled,
            automatic_payment_source: request.automatic_payment_source.clone(),
            fixed_amount_requested_money: request
                .fixed_amount_requested
                .map(|m| SquareMoney::new(m.amount, m.currency.to_string())),
            percentage_requested: request.percentage_requested.map(|p| p.to_string()),
            computed_amount_money: None,
            total_completed_amount_money: None,
        })
    }

    fn build_accepted_payment_methods(
        methods: &InvoiceAcceptedPaymentMethods,
    ) -> SquareInvoiceAcceptedPaymentMethods {
        SquareInvoiceAcceptedPaymentMethods {
            card: Some(methods.card),
            square_gift_card: Some(methods.square_gift_card),
            bank_account: Some(methods.bank_account),
            buy_now_pay_later: Some(methods.buy_now_pay_later),
            cash_app_pay: Some(methods.cash_app_pay),
        }
    }

    fn build_custom_field(field: &InvoiceCustomField) -> SquareInvoiceCustomField {
        SquareInvoiceCustomField {
            label: Some(field.label.clone()),
            value: field.value.clone(),
            placement: field.placement.map(|p| p.to_string()),
        }
    }

    /// Sync mutable fields from a Square invoice response onto the local
    /// invoice.
    ///
    /// One-directional: vendor-present fields win, local-only fields are
    /// left untouched. Applying the same response twice is a no-op the
    /// second time.
    pub fn sync_from_square_response(invoice: &mut Invoice, square: &SquareInvoice) -> Result<()> {
        invoice.payment_service_id = square.id.clone();
        invoice.payment_service_version = square.version;
        invoice.public_url = square.public_url.clone();
        invoice.invoice_number = square.invoice_number.clone();

        if let Some(status) = square.status.as_deref() {
            invoice.status = status.parse().map_err(AppError::validation)?;
        }

        if let Some(money) = &square.next_payment_amount_money {
            if let (Some(amount), Some(currency)) = (money.amount, money.currency.as_deref()) {
                let currency: Currency = currency
                    .parse()
                    .map_err(|e: String| AppError::validation(e))?;
                invoice.next_payment_amount = Some(Money::new(amount, currency));
            }
        }

        Ok(())
    }
}
