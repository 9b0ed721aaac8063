// Wire shapes for the Square API endpoints this crate talks to.
//
// Fields mirror Square's JSON exactly; everything optional on the wire is
// optional here, and `None` fields are omitted from request bodies.

use serde::{Deserialize, Serialize};

/// Money as it appears on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareMoney {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl SquareMoney {
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            currency: Some(currency.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_district_level_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareInvoiceRecipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<SquareAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareInvoicePaymentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipping_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic_payment_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_amount_requested_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_requested: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_amount_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_completed_amount_money: Option<SquareMoney>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareInvoiceAcceptedPaymentMethods {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_gift_card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_now_pay_later: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_app_pay: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareInvoiceCustomField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareInvoiceAttachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesize: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
}

/// An invoice as Square represents it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SquareInvoice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_or_service_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_payment_method_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_recipient: Option<SquareInvoiceRecipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_requests: Option<Vec<SquareInvoicePaymentRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_payment_methods: Option<SquareInvoiceAcceptedPaymentMethods>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<SquareInvoiceCustomField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<SquareInvoiceAttachment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment_amount_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateInvoiceRequest {
    pub idempotency_key: String,
    pub invoice: SquareInvoice,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateInvoiceRequest {
    pub idempotency_key: String,
    pub invoice: SquareInvoice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields_to_clear: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishInvoiceRequest {
    pub version: i64,
    pub idempotency_key: String,
}

/// Response envelope shared by the invoice endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceResponse {
    pub invoice: Option<SquareInvoice>,
    #[serde(default)]
    pub errors: Vec<SquareError>,
}

/// One error entry from a Square response body
#[derive(Debug, Clone, Deserialize)]
pub struct SquareError {
    pub category: Option<String>,
    pub code: Option<String>,
    pub detail: Option<String>,
    pub field: Option<String>,
}

//
// Order returns
//

/// A line item within a Square-reported order return.
///
/// Square serializes quantities as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SquareOrderReturnLineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line_item_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation_total_price_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_return_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_discount_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_service_charge_money: Option<SquareMoney>,
}

/// The money totals block of an order return
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SquareReturnAmounts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip_money: Option<SquareMoney>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_charge_money: Option<SquareMoney>,
}

/// An order return as Square reports it.
///
/// The tax/discount/service-charge/tip blocks are carried as raw JSON; this
/// crate mirrors them without interpreting their contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SquareOrderReturn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_line_items: Option<Vec<SquareOrderReturnLineItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_service_charges: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_taxes: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_discounts: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_tips: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounding_adjustment: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_amounts: Option<SquareReturnAmounts>,
}
