use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Money, Result};

/// How a deductible adjusts an amount: by percentage or by a fixed amount.
///
/// Exactly one of the two is ever present. Taxes, discounts and service
/// charges all carry one of these, which makes the percentage-XOR-amount
/// rule impossible to violate once a value has been constructed; the rule is
/// enforced at the boundary by [`DeductibleRate::from_parts`], which is how
/// nullable database columns and API input are hydrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductibleRate {
    /// Whole percent, e.g. `2.5` for 2.5%
    Percentage(Decimal),
    /// Fixed minor-unit amount
    Fixed(Money),
}

impl DeductibleRate {
    /// Build a rate from a pair of nullable fields, enforcing that exactly
    /// one of them is set to a non-zero value.
    ///
    /// `kind` names the entity in error messages ("Service charge", "Tax",
    /// "Discount").
    pub fn from_parts(
        kind: &str,
        percentage: Option<Decimal>,
        fixed_amount: Option<Money>,
    ) -> Result<Self> {
        let percentage = percentage.filter(|p| !p.is_zero());
        let fixed_amount = fixed_amount.filter(|m| !m.is_zero());

        match (percentage, fixed_amount) {
            (Some(_), Some(_)) => Err(AppError::validation(format!(
                "{} cannot have both percentage and fixed amount set. Please specify only one.",
                kind
            ))),
            (None, None) => Err(AppError::validation(format!(
                "{} must have either percentage or fixed amount set.",
                kind
            ))),
            (Some(pct), None) => {
                if pct < Decimal::ZERO {
                    return Err(AppError::validation(format!(
                        "{} percentage cannot be negative",
                        kind
                    )));
                }
                Ok(DeductibleRate::Percentage(pct))
            }
            (None, Some(money)) => {
                if money.amount < 0 {
                    return Err(AppError::validation(format!(
                        "{} amount cannot be negative",
                        kind
                    )));
                }
                Ok(DeductibleRate::Fixed(money))
            }
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, DeductibleRate::Percentage(_))
    }

    pub fn is_fixed_amount(&self) -> bool {
        matches!(self, DeductibleRate::Fixed(_))
    }

    pub fn percentage(&self) -> Option<Decimal> {
        match self {
            DeductibleRate::Percentage(pct) => Some(*pct),
            DeductibleRate::Fixed(_) => None,
        }
    }

    pub fn fixed_amount(&self) -> Option<Money> {
        match self {
            DeductibleRate::Percentage(_) => None,
            DeductibleRate::Fixed(money) => Some(*money),
        }
    }

    /// The minor-unit amount this rate yields against `base`.
    ///
    /// Percentage rates round half away from zero; fixed rates ignore the
    /// base entirely (a fixed amount in a different currency surfaces as a
    /// currency-mismatch error when the caller combines the two).
    pub fn amount_against(&self, base: Money) -> Money {
        match self {
            DeductibleRate::Percentage(pct) => base.percentage_of(*pct),
            DeductibleRate::Fixed(money) => *money,
        }
    }
}
