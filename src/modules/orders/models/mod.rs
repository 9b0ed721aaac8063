pub mod fulfillment;
pub mod line_item;
pub mod location;
pub mod order;
pub mod order_return;
pub mod product;
pub mod recipient;
pub mod refund;
pub mod return_line_item;

pub use fulfillment::{Fulfillment, FulfillmentState, FulfillmentType, PickupDetails, ScheduleType};
pub use line_item::OrderLineItem;
pub use location::Location;
pub use order::{Attached, LineItemAggregate, OrderAggregate, OrderRef};
pub use order_return::OrderReturn;
pub use product::Product;
pub use recipient::{Address, Recipient, RecipientData};
pub use refund::{Refund, RefundStatus, RefundTarget};
pub use return_line_item::OrderReturnLineItem;
