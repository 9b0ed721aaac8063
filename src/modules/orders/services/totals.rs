// Order total calculation.
//
// A single pass over the aggregate in fixed precedence order: line-scoped
// discounts, taxes and charges per line; then order-scoped discounts, taxes
// and service charges by calculation phase. All arithmetic is integer minor
// units; percentage applications round half away from zero where they are
// applied.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::core::{AppError, Currency, Money, Result};
use crate::modules::deductibles::models::{CalculationPhase, TaxInclusionType};
use crate::modules::orders::models::{LineItemAggregate, OrderAggregate};

/// Money breakdown for one order line
#[derive(Debug, Clone, PartialEq)]
pub struct LineTotals {
    pub line_item_id: Option<i64>,
    pub gross_sales: Money,
    pub total_discount: Money,
    pub total_tax: Money,
    pub total_service_charge: Money,
    pub total: Money,
}

/// Money breakdown for a whole order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub currency: Currency,
    pub gross_sales: Money,
    pub total_discount: Money,
    pub total_tax: Money,
    pub total_service_charge: Money,
    pub total: Money,
    pub line_totals: Vec<LineTotals>,
}

/// Calculate the final total of an order aggregate.
///
/// The precedence is fixed: per line, discounts then taxes then line-treated
/// service charges; across the order, discounts, then subtotal-phase service
/// charges, then taxes (taxable subtotal-phase charge amounts are part of
/// the tax base), then total-phase charges, then apportioned fixed amounts.
/// All inputs must share one currency.
pub fn calculate_order_total(aggregate: &OrderAggregate) -> Result<OrderTotals> {
    if aggregate.line_items.is_empty() {
        return Err(AppError::missing_property(
            "Cannot calculate an order total without line items",
        ));
    }

    // Currency comes from the first money value encountered
    let currency = aggregate.line_items[0]
        .line
        .unit_price(&aggregate.line_items[0].product)?
        .currency;

    let mut line_totals = Vec::with_capacity(aggregate.line_items.len());
    for line in &aggregate.line_items {
        line_totals.push(calculate_line_totals(line, currency)?);
    }

    let mut gross_sales = Money::zero(currency);
    let mut discount_total = Money::zero(currency);
    let mut tax_total = Money::zero(currency);
    let mut charge_total = Money::zero(currency);
    let mut subtotal = Money::zero(currency);

    for lt in &line_totals {
        gross_sales = gross_sales.add(lt.gross_sales)?;
        discount_total = discount_total.add(lt.total_discount)?;
        tax_total = tax_total.add(lt.total_tax)?;
        charge_total = charge_total.add(lt.total_service_charge)?;
        subtotal = subtotal.add(lt.total)?;
    }

    // Order-scoped discounts, applied sequentially to the running amount
    let mut running = subtotal;
    for discount in aggregate.discounts.iter().filter(|d| d.entity.enabled) {
        let before = running;
        running = match discount.entity.rate.percentage() {
            Some(pct) => reduce_by_percentage(running, pct),
            None => running.saturating_sub(discount.entity.rate.amount_against(running))?,
        };
        discount_total = discount_total.add(before.saturating_sub(running)?)?;
    }
    let discounted_subtotal = running;

    // Subtotal-phase service charges compute against the discounted order
    // subtotal, independently of one another
    let mut subtotal_charge_total = Money::zero(currency);
    let mut taxable_charge_total = Money::zero(currency);
    for charge in &aggregate.service_charges {
        if charge.entity.calculation_phase != CalculationPhase::Subtotal {
            continue;
        }
        let amount = charge.entity.rate.amount_against(discounted_subtotal);
        subtotal_charge_total = subtotal_charge_total.add(amount)?;
        if charge.entity.taxable {
            taxable_charge_total = taxable_charge_total.add(amount)?;
        }
    }
    charge_total = charge_total.add(subtotal_charge_total)?;

    // Order-scoped taxes; taxable subtotal-phase charges join the base
    let tax_base = discounted_subtotal.add(taxable_charge_total)?;
    let mut order_tax_total = Money::zero(currency);
    for tax in aggregate.taxes.iter().filter(|t| t.entity.enabled) {
        let amount = tax.entity.rate.amount_against(tax_base);
        tax_total = tax_total.add(amount)?;
        if tax.entity.inclusion_type == TaxInclusionType::Additive {
            order_tax_total = order_tax_total.add(amount)?;
        }
    }

    running = discounted_subtotal
        .add(subtotal_charge_total)?
        .add(order_tax_total)?;

    // Total-phase service charges compute against the running total
    let total_phase_base = running;
    for charge in &aggregate.service_charges {
        if charge.entity.calculation_phase != CalculationPhase::Total {
            continue;
        }
        let amount = charge.entity.rate.amount_against(total_phase_base);
        charge_total = charge_total.add(amount)?;
        running = running.add(amount)?;
    }

    // Apportioned fixed amounts are distributed across lines by line total
    for charge in &aggregate.service_charges {
        if charge.entity.calculation_phase != CalculationPhase::ApportionedAmount {
            continue;
        }
        let amount = charge.entity.rate.fixed_amount().ok_or_else(|| {
            AppError::validation(format!(
                "Service charge \"{}\" with APPORTIONED_AMOUNT phase must use a fixed amount",
                charge.entity.name
            ))
        })?;

        let weights: Vec<i64> = line_totals.iter().map(|lt| lt.total.amount).collect();
        let shares = apportion(amount.amount, &weights);
        for (lt, share) in line_totals.iter_mut().zip(shares) {
            let share = Money::new(share, currency);
            lt.total_service_charge = lt.total_service_charge.add(share)?;
            lt.total = lt.total.add(share)?;
        }

        charge_total = charge_total.add(Money::new(amount.amount, currency))?;
        running = running.add(Money::new(amount.amount, currency))?;
    }

    debug!(
        order_id = aggregate.order.id,
        total = running.amount,
        "Calculated order total"
    );

    Ok(OrderTotals {
        currency,
        gross_sales,
        total_discount: discount_total,
        total_tax: tax_total,
        total_service_charge: charge_total,
        total: Money::new(running.amount.max(0), currency),
        line_totals,
    })
}

fn calculate_line_totals(line: &LineItemAggregate, currency: Currency) -> Result<LineTotals> {
    let unit_price = line.line.unit_price(&line.product)?;
    if unit_price.currency != currency {
        return Err(AppError::validation(format!(
            "Currency mismatch: {} and {}",
            currency, unit_price.currency
        )));
    }

    let gross = unit_price.multiply(line.line.quantity);
    let mut running = gross;

    let mut discount_total = Money::zero(currency);
    for discount in line.discounts.iter().filter(|d| d.entity.enabled) {
        let before = running;
        running = match discount.entity.rate.percentage() {
            Some(pct) => reduce_by_percentage(running, pct),
            None => running.saturating_sub(discount.entity.rate.amount_against(running))?,
        };
        discount_total = discount_total.add(before.saturating_sub(running)?)?;
    }

    let mut tax_total = Money::zero(currency);
    for tax in line.taxes.iter().filter(|t| t.entity.enabled) {
        let amount = tax.entity.rate.amount_against(running);
        tax_total = tax_total.add(amount)?;
        if tax.entity.inclusion_type == TaxInclusionType::Additive {
            running = running.add(amount)?;
        }
    }

    let mut charge_total = Money::zero(currency);
    for charge in &line.service_charges {
        match charge.entity.calculation_phase {
            CalculationPhase::Total => {
                let amount = charge.entity.rate.amount_against(running);
                charge_total = charge_total.add(amount)?;
                running = running.add(amount)?;
            }
            // Attaching these at line scope is allowed; computing against
            // them is not
            phase => {
                return Err(AppError::validation(format!(
                    "Service charge calculation phase \"{}\" cannot be applied to products in an order",
                    phase
                )));
            }
        }
    }

    Ok(LineTotals {
        line_item_id: line.line.id,
        gross_sales: gross,
        total_discount: discount_total,
        total_tax: tax_total,
        total_service_charge: charge_total,
        total: running,
    })
}

/// Multiply by `(1 - pct/100)`, rounding the result half away from zero and
/// clamping at zero
fn reduce_by_percentage(amount: Money, pct: Decimal) -> Money {
    let factor = Decimal::ONE - pct / Decimal::ONE_HUNDRED;
    let raw = Decimal::from(amount.amount) * factor;
    let rounded = raw
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0);
    Money::new(rounded.max(0), amount.currency)
}

/// Split `amount` across `weights` proportionally, assigning leftover minor
/// units by largest remainder so the shares always sum to `amount` exactly
fn apportion(amount: i64, weights: &[i64]) -> Vec<i64> {
    if weights.is_empty() {
        return Vec::new();
    }

    let total_weight: i64 = weights.iter().sum();
    if total_weight == 0 {
        // Degenerate order of zero-value lines: split evenly
        let base = amount / weights.len() as i64;
        let mut remainder = amount - base * weights.len() as i64;
        return weights
            .iter()
            .map(|_| {
                let extra = if remainder > 0 { 1 } else { 0 };
                remainder -= extra;
                base + extra
            })
            .collect();
    }

    let mut shares: Vec<i64> = Vec::with_capacity(weights.len());
    let mut remainders: Vec<(usize, i64)> = Vec::with_capacity(weights.len());
    for (i, weight) in weights.iter().enumerate() {
        let numerator = amount * weight;
        shares.push(numerator / total_weight);
        remainders.push((i, numerator % total_weight));
    }

    let mut leftover = amount - shares.iter().sum::<i64>();
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (index, _) in remainders {
        if leftover == 0 {
            break;
        }
        shares[index] += 1;
        leftover -= 1;
    }

    shares
}
