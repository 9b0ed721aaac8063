pub mod order_service;
pub mod recipient_builder;
pub mod totals;

pub use order_service::OrderService;
pub use recipient_builder::{RecipientBuilder, RecipientLookup};
pub use totals::{calculate_order_total, LineTotals, OrderTotals};
