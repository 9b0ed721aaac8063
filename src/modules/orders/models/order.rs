use serde::{Deserialize, Serialize};

use crate::modules::deductibles::models::{
    AttachmentScope, Discount, ServiceCharge, Tax,
};

use super::fulfillment::Fulfillment;
use super::line_item::OrderLineItem;
use super::product::Product;

/// Reference to the host application's order.
///
/// The order table itself belongs to the embedding application; this crate
/// never names or loads the host's order type. Hosts derive an `OrderRef`
/// from their own model and hand it to the aggregate, which is the only
/// shape the calculation engine and builders ever see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRef {
    pub id: i64,
    /// Square's identifier for this order, once it has been pushed
    pub square_order_id: Option<String>,
}

impl OrderRef {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            square_order_id: None,
        }
    }

    pub fn with_square_id(id: i64, square_order_id: impl Into<String>) -> Self {
        Self {
            id,
            square_order_id: Some(square_order_id.into()),
        }
    }
}

/// A deductible together with the scope recorded on its pivot row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attached<T> {
    pub entity: T,
    pub scope: AttachmentScope,
}

impl<T> Attached<T> {
    pub fn new(entity: T, scope: AttachmentScope) -> Self {
        Self { entity, scope }
    }
}

/// One order line with its product and line-scoped deductibles resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemAggregate {
    pub line: OrderLineItem,
    pub product: Product,
    pub taxes: Vec<Attached<Tax>>,
    pub discounts: Vec<Attached<Discount>>,
    pub service_charges: Vec<Attached<ServiceCharge>>,
}

impl LineItemAggregate {
    pub fn new(line: OrderLineItem, product: Product) -> Self {
        Self {
            line,
            product,
            taxes: Vec::new(),
            discounts: Vec::new(),
            service_charges: Vec::new(),
        }
    }
}

/// An order with everything the calculation engine and request builders
/// need: line items, order-scoped deductibles, and fulfillment data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAggregate {
    pub order: OrderRef,
    pub line_items: Vec<LineItemAggregate>,
    pub taxes: Vec<Attached<Tax>>,
    pub discounts: Vec<Attached<Discount>>,
    pub service_charges: Vec<Attached<ServiceCharge>>,
    pub fulfillment: Option<Fulfillment>,
}

impl OrderAggregate {
    pub fn new(order: OrderRef) -> Self {
        Self {
            order,
            line_items: Vec::new(),
            taxes: Vec::new(),
            discounts: Vec::new(),
            service_charges: Vec::new(),
            fulfillment: None,
        }
    }

    pub fn with_line_items(mut self, line_items: Vec<LineItemAggregate>) -> Self {
        self.line_items = line_items;
        self
    }

    pub fn has_tax(&self, id: i64) -> bool {
        self.taxes.iter().any(|t| t.entity.id == Some(id))
    }

    pub fn has_discount(&self, id: i64) -> bool {
        self.discounts.iter().any(|d| d.entity.id == Some(id))
    }

    pub fn has_service_charge(&self, id: i64) -> bool {
        self.service_charges.iter().any(|s| s.entity.id == Some(id))
    }
}
