use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, Currency, Result};

/// An integer amount of money in minor units (cents) plus its currency.
///
/// All order and invoice arithmetic happens on this type. Amounts are never
/// fractional; percentage applications round half away from zero at the
/// point of application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Add another amount of the same currency.
    ///
    /// Mixing currencies is a validation error; there is no cross-currency
    /// arithmetic anywhere in this crate.
    pub fn add(&self, other: Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        Ok(Money::new(self.amount + other.amount, self.currency))
    }

    /// Subtract another amount of the same currency, clamping at zero.
    ///
    /// A discount larger than the amount it applies to zeroes it out rather
    /// than producing a negative total.
    pub fn saturating_sub(&self, other: Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        Ok(Money::new(
            (self.amount - other.amount).max(0),
            self.currency,
        ))
    }

    /// Multiply by a line quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money::new(self.amount * i64::from(quantity), self.currency)
    }

    /// Compute `percentage`% of this amount, rounded half away from zero.
    ///
    /// `percentage` is expressed in whole percent, e.g. `dec!(2.5)` for 2.5%.
    pub fn percentage_of(&self, percentage: Decimal) -> Money {
        let raw = Decimal::from(self.amount) * percentage / Decimal::ONE_HUNDRED;
        let rounded = raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        // i64 minor-unit amounts always fit back into i64 after a percentage
        let amount = rounded.to_i64().unwrap_or(0);
        Money::new(amount, self.currency)
    }

    fn ensure_same_currency(&self, other: Money) -> Result<()> {
        if self.currency != other.currency {
            return Err(AppError::validation(format!(
                "Currency mismatch: {} and {}",
                self.currency, other.currency
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.currency.format_amount(self.amount))
    }
}
