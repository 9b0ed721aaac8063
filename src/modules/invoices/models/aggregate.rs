use serde::{Deserialize, Serialize};

use crate::modules::orders::models::{Location, OrderRef};

use super::accepted_payment_methods::InvoiceAcceptedPaymentMethods;
use super::attachment::InvoiceAttachment;
use super::custom_field::InvoiceCustomField;
use super::invoice::Invoice;
use super::payment_request::InvoicePaymentRequest;
use super::recipient::InvoiceRecipient;

/// An invoice with its children and order/location context resolved.
///
/// The order reference comes from the host application (the order table is
/// the host's); everything else is loaded from this crate's tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceAggregate {
    pub invoice: Invoice,
    pub order: Option<OrderRef>,
    pub location: Option<Location>,
    pub recipient: Option<InvoiceRecipient>,
    pub payment_requests: Vec<InvoicePaymentRequest>,
    pub accepted_payment_methods: Option<InvoiceAcceptedPaymentMethods>,
    pub custom_fields: Vec<InvoiceCustomField>,
    pub attachments: Vec<InvoiceAttachment>,
}

impl InvoiceAggregate {
    pub fn new(invoice: Invoice) -> Self {
        Self {
            invoice,
            order: None,
            location: None,
            recipient: None,
            payment_requests: Vec::new(),
            accepted_payment_methods: None,
            custom_fields: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: OrderRef) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}
