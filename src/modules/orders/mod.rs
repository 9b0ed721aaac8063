pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    Attached, Fulfillment, LineItemAggregate, Location, OrderAggregate, OrderLineItem, OrderRef,
    OrderReturn, OrderReturnLineItem, Product, Recipient, RecipientData, Refund, RefundTarget,
};
pub use services::{calculate_order_total, OrderService, OrderTotals};
