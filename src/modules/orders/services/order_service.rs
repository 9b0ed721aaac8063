use std::sync::Arc;

use tracing::info;

use crate::core::Result;
use crate::modules::deductibles::models::{
    DeductibleKind, Discount, FeaturableRef, ServiceCharge, Tax,
};
use crate::modules::deductibles::repositories::DeductibleRepository;
use crate::modules::orders::models::{Attached, LineItemAggregate, OrderAggregate, OrderRef};
use crate::modules::orders::repositories::OrderRepository;

use super::totals::{calculate_order_total, OrderTotals};

/// Assembles order aggregates from their persisted parts and runs the
/// total calculation against them.
///
/// The order row itself belongs to the host application; the host hands in
/// an [`OrderRef`] and this service gathers everything keyed by it.
pub struct OrderService {
    orders: Arc<OrderRepository>,
    deductibles: Arc<DeductibleRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<OrderRepository>, deductibles: Arc<DeductibleRepository>) -> Self {
        Self {
            orders,
            deductibles,
        }
    }

    /// Load the aggregate for a host order: its line items with their
    /// products and line-scoped deductibles, plus the order-scoped
    /// deductibles.
    pub async fn load_aggregate(&self, order: OrderRef) -> Result<OrderAggregate> {
        let lines = self.orders.line_items(order.id).await?;

        let mut line_items = Vec::with_capacity(lines.len());
        for line in lines {
            let product = self.orders.find_product(line.product_id).await?;
            let mut line_aggregate = LineItemAggregate::new(line, product);

            if let Some(line_id) = line_aggregate.line.id {
                let resolved = self.resolve(FeaturableRef::line_item(line_id)).await?;
                line_aggregate.taxes = resolved.taxes;
                line_aggregate.discounts = resolved.discounts;
                line_aggregate.service_charges = resolved.service_charges;
            }

            line_items.push(line_aggregate);
        }

        let resolved = self.resolve(FeaturableRef::order(order.id)).await?;

        let mut aggregate = OrderAggregate::new(order).with_line_items(line_items);
        aggregate.taxes = resolved.taxes;
        aggregate.discounts = resolved.discounts;
        aggregate.service_charges = resolved.service_charges;

        Ok(aggregate)
    }

    /// Calculate an order's totals and write the per-line money snapshots
    /// back onto the line item rows.
    pub async fn calculate_and_store(&self, order: OrderRef) -> Result<OrderTotals> {
        let aggregate = self.load_aggregate(order).await?;
        let totals = calculate_order_total(&aggregate)?;

        self.orders.save_line_totals(&totals).await?;
        info!(
            order_id = aggregate.order.id,
            total = totals.total.amount,
            "Stored order totals"
        );

        Ok(totals)
    }

    /// Resolve the pivot rows attached to a featurable into their entities,
    /// keeping the scope recorded at attach time.
    async fn resolve(&self, featurable: FeaturableRef) -> Result<ResolvedDeductibles> {
        let mut resolved = ResolvedDeductibles::default();

        for attachment in self.deductibles.attachments_for(featurable).await? {
            let id = attachment.deductible.id;
            match attachment.deductible.kind {
                DeductibleKind::Tax => {
                    resolved.taxes.push(Attached::new(
                        self.deductibles.find_tax(id).await?,
                        attachment.scope,
                    ));
                }
                DeductibleKind::Discount => {
                    resolved.discounts.push(Attached::new(
                        self.deductibles.find_discount(id).await?,
                        attachment.scope,
                    ));
                }
                DeductibleKind::ServiceCharge => {
                    resolved.service_charges.push(Attached::new(
                        self.deductibles.find_service_charge(id).await?,
                        attachment.scope,
                    ));
                }
            }
        }

        Ok(resolved)
    }
}

#[derive(Default)]
struct ResolvedDeductibles {
    taxes: Vec<Attached<Tax>>,
    discounts: Vec<Attached<Discount>>,
    service_charges: Vec<Attached<ServiceCharge>>,
}
