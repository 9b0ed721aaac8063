pub mod accepted_payment_methods;
pub mod aggregate;
pub mod attachment;
pub mod custom_field;
pub mod invoice;
pub mod payment_request;
pub mod recipient;

pub use accepted_payment_methods::InvoiceAcceptedPaymentMethods;
pub use aggregate::InvoiceAggregate;
pub use attachment::InvoiceAttachment;
pub use custom_field::{CustomFieldPlacement, InvoiceCustomField};
pub use invoice::{DeliveryMethod, Invoice, InvoiceStatus};
pub use payment_request::{InvoicePaymentRequest, PaymentRequestType};
pub use recipient::InvoiceRecipient;
