pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    DeliveryMethod, Invoice, InvoiceAcceptedPaymentMethods, InvoiceAggregate, InvoiceAttachment,
    InvoiceCustomField, InvoicePaymentRequest, InvoiceRecipient, InvoiceStatus, PaymentRequestType,
};
pub use services::{InvoiceBuilder, InvoiceService};
