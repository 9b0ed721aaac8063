use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

use super::rate::DeductibleRate;

/// When in the total-computation sequence a service charge is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(30)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationPhase {
    Subtotal,
    Total,
    ApportionedAmount,
}

impl std::fmt::Display for CalculationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalculationPhase::Subtotal => write!(f, "SUBTOTAL"),
            CalculationPhase::Total => write!(f, "TOTAL"),
            CalculationPhase::ApportionedAmount => write!(f, "APPORTIONED_AMOUNT"),
        }
    }
}

/// How a service charge is treated against the order's line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(30)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreatmentType {
    LineItem,
    Apportioned,
}

/// A service charge that can be attached to an order or a line item.
///
/// Phase/treatment compatibility is validated at construction; line-item
/// applicability is validated separately (see
/// [`ServiceCharge::validate_line_item_application`]) because attaching a
/// charge at line scope is allowed before the charge's phase makes it
/// computable there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCharge {
    pub id: Option<i64>,
    pub name: String,
    pub rate: DeductibleRate,
    pub calculation_phase: CalculationPhase,
    pub treatment_type: TreatmentType,
    pub taxable: bool,
    pub reference_id: Option<String>,
    pub square_catalog_object_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ServiceCharge {
    /// Create a new service charge with validation
    pub fn new(
        name: impl Into<String>,
        rate: DeductibleRate,
        calculation_phase: CalculationPhase,
        treatment_type: TreatmentType,
        taxable: bool,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("Service charge name cannot be empty"));
        }

        Self::validate_phase_rules(calculation_phase, treatment_type, taxable)?;

        Ok(Self {
            id: None,
            name,
            rate,
            calculation_phase,
            treatment_type,
            taxable,
            reference_id: None,
            square_catalog_object_id: None,
            created_at: None,
            updated_at: None,
        })
    }

    /// Validate phase/treatment/taxable compatibility.
    ///
    /// Runs on create and on update, before any write.
    pub fn validate_phase_rules(
        calculation_phase: CalculationPhase,
        treatment_type: TreatmentType,
        taxable: bool,
    ) -> Result<()> {
        if calculation_phase == CalculationPhase::Total && taxable {
            return Err(AppError::validation(
                "Total phase service charges cannot be taxable",
            ));
        }

        if calculation_phase == CalculationPhase::ApportionedAmount
            && treatment_type == TreatmentType::LineItem
        {
            return Err(AppError::validation(
                "Apportioned amount phase cannot be used with line item treatment",
            ));
        }

        Ok(())
    }

    /// Check whether this charge may be applied at the line-item level.
    ///
    /// Subtotal-phase charges only make sense against the order subtotal.
    /// This is intentionally not part of attach-time validation.
    pub fn validate_line_item_application(&self) -> Result<()> {
        if self.calculation_phase == CalculationPhase::Subtotal {
            return Err(AppError::validation(
                "Subtotal phase service charges cannot be applied at the product (line-item) level",
            ));
        }

        Ok(())
    }
}
