pub mod invoice_builder;
pub mod invoice_service;

pub use invoice_builder::InvoiceBuilder;
pub use invoice_service::InvoiceService;
