// MySQL persistence for taxes, discounts, service charges and the
// polymorphic deductible pivot table.
//
// Domain models carry a structural `DeductibleRate`, so rows are read into
// private row structs (nullable percentage/amount columns) and hydrated
// through `DeductibleRate::from_parts`, which is where the XOR rule fires
// for data written by anything other than this crate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;

use crate::core::{AppError, Currency, Money, Result};
use crate::modules::deductibles::models::{
    AttachmentScope, CalculationPhase, DeductibleAttachment, DeductibleKind, DeductibleRate,
    DeductibleRef, Discount, FeaturableKind, FeaturableRef, ServiceCharge, Tax, TaxInclusionType,
    TreatmentType,
};

/// Repository for deductible entities and their attachments
pub struct DeductibleRepository {
    pool: MySqlPool,
}

#[derive(FromRow)]
struct TaxRow {
    id: i64,
    name: String,
    percentage: Option<Decimal>,
    amount_money: Option<i64>,
    amount_currency: Option<String>,
    inclusion_type: TaxInclusionType,
    applies_to_custom_amounts: bool,
    enabled: bool,
    reference_id: Option<String>,
    square_catalog_object_id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct DiscountRow {
    id: i64,
    name: String,
    percentage: Option<Decimal>,
    amount_money: Option<i64>,
    amount_currency: Option<String>,
    enabled: bool,
    reference_id: Option<String>,
    square_catalog_object_id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct ServiceChargeRow {
    id: i64,
    name: String,
    percentage: Option<Decimal>,
    amount_money: Option<i64>,
    amount_currency: Option<String>,
    calculation_phase: CalculationPhase,
    treatment_type: TreatmentType,
    taxable: bool,
    reference_id: Option<String>,
    square_catalog_object_id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct AttachmentRow {
    id: i64,
    featurable_kind: FeaturableKind,
    featurable_id: i64,
    deductible_kind: DeductibleKind,
    deductible_id: i64,
    scope: AttachmentScope,
    created_at: Option<DateTime<Utc>>,
}

fn rate_from_columns(
    kind: &str,
    percentage: Option<Decimal>,
    amount: Option<i64>,
    currency: Option<String>,
) -> Result<DeductibleRate> {
    let fixed = match (amount, currency) {
        (Some(amount), Some(currency)) => {
            let currency: Currency = currency
                .parse()
                .map_err(|e: String| AppError::validation(e))?;
            Some(Money::new(amount, currency))
        }
        (Some(_), None) => {
            return Err(AppError::validation(format!(
                "{} amount is missing its currency",
                kind
            )))
        }
        _ => None,
    };

    DeductibleRate::from_parts(kind, percentage, fixed)
}

impl TryFrom<TaxRow> for Tax {
    type Error = AppError;

    fn try_from(row: TaxRow) -> Result<Self> {
        Ok(Tax {
            id: Some(row.id),
            name: row.name,
            rate: rate_from_columns("Tax", row.percentage, row.amount_money, row.amount_currency)?,
            inclusion_type: row.inclusion_type,
            applies_to_custom_amounts: row.applies_to_custom_amounts,
            enabled: row.enabled,
            reference_id: row.reference_id,
            square_catalog_object_id: row.square_catalog_object_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DiscountRow> for Discount {
    type Error = AppError;

    fn try_from(row: DiscountRow) -> Result<Self> {
        Ok(Discount {
            id: Some(row.id),
            name: row.name,
            rate: rate_from_columns(
                "Discount",
                row.percentage,
                row.amount_money,
                row.amount_currency,
            )?,
            enabled: row.enabled,
            reference_id: row.reference_id,
            square_catalog_object_id: row.square_catalog_object_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<ServiceChargeRow> for ServiceCharge {
    type Error = AppError;

    fn try_from(row: ServiceChargeRow) -> Result<Self> {
        // Re-run the phase rules so rows written by older schema versions
        // cannot smuggle an invalid combination into the engine
        ServiceCharge::validate_phase_rules(row.calculation_phase, row.treatment_type, row.taxable)?;

        Ok(ServiceCharge {
            id: Some(row.id),
            name: row.name,
            rate: rate_from_columns(
                "Service charge",
                row.percentage,
                row.amount_money,
                row.amount_currency,
            )?,
            calculation_phase: row.calculation_phase,
            treatment_type: row.treatment_type,
            taxable: row.taxable,
            reference_id: row.reference_id,
            square_catalog_object_id: row.square_catalog_object_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl DeductibleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create_tax(&self, tax: &Tax) -> Result<Tax> {
        let result = sqlx::query(
            r#"
            INSERT INTO taxes (
                name, percentage, amount_money, amount_currency, inclusion_type,
                applies_to_custom_amounts, enabled, reference_id, square_catalog_object_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tax.name)
        .bind(tax.rate.percentage())
        .bind(tax.rate.fixed_amount().map(|m| m.amount))
        .bind(tax.rate.fixed_amount().map(|m| m.currency.to_string()))
        .bind(tax.inclusion_type)
        .bind(tax.applies_to_custom_amounts)
        .bind(tax.enabled)
        .bind(&tax.reference_id)
        .bind(&tax.square_catalog_object_id)
        .execute(&self.pool)
        .await?;

        self.find_tax(result.last_insert_id() as i64).await
    }

    pub async fn update_tax(&self, tax: &Tax) -> Result<Tax> {
        let id = tax
            .id
            .ok_or_else(|| AppError::validation("Cannot update an unsaved tax"))?;

        sqlx::query(
            r#"
            UPDATE taxes SET
                name = ?, percentage = ?, amount_money = ?, amount_currency = ?,
                inclusion_type = ?, applies_to_custom_amounts = ?, enabled = ?,
                reference_id = ?, square_catalog_object_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&tax.name)
        .bind(tax.rate.percentage())
        .bind(tax.rate.fixed_amount().map(|m| m.amount))
        .bind(tax.rate.fixed_amount().map(|m| m.currency.to_string()))
        .bind(tax.inclusion_type)
        .bind(tax.applies_to_custom_amounts)
        .bind(tax.enabled)
        .bind(&tax.reference_id)
        .bind(&tax.square_catalog_object_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_tax(id).await
    }

    pub async fn find_tax(&self, id: i64) -> Result<Tax> {
        let row = sqlx::query_as::<_, TaxRow>("SELECT * FROM taxes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tax {}", id)))?;

        row.try_into()
    }

    pub async fn create_discount(&self, discount: &Discount) -> Result<Discount> {
        let result = sqlx::query(
            r#"
            INSERT INTO discounts (
                name, percentage, amount_money, amount_currency, enabled,
                reference_id, square_catalog_object_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&discount.name)
        .bind(discount.rate.percentage())
        .bind(discount.rate.fixed_amount().map(|m| m.amount))
        .bind(discount.rate.fixed_amount().map(|m| m.currency.to_string()))
        .bind(discount.enabled)
        .bind(&discount.reference_id)
        .bind(&discount.square_catalog_object_id)
        .execute(&self.pool)
        .await?;

        self.find_discount(result.last_insert_id() as i64).await
    }

    pub async fn update_discount(&self, discount: &Discount) -> Result<Discount> {
        let id = discount
            .id
            .ok_or_else(|| AppError::validation("Cannot update an unsaved discount"))?;

        sqlx::query(
            r#"
            UPDATE discounts SET
                name = ?, percentage = ?, amount_money = ?, amount_currency = ?,
                enabled = ?, reference_id = ?, square_catalog_object_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&discount.name)
        .bind(discount.rate.percentage())
        .bind(discount.rate.fixed_amount().map(|m| m.amount))
        .bind(discount.rate.fixed_amount().map(|m| m.currency.to_string()))
        .bind(discount.enabled)
        .bind(&discount.reference_id)
        .bind(&discount.square_catalog_object_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_discount(id).await
    }

    pub async fn find_discount(&self, id: i64) -> Result<Discount> {
        let row = sqlx::query_as::<_, DiscountRow>("SELECT * FROM discounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Discount {}", id)))?;

        row.try_into()
    }

    pub async fn create_service_charge(&self, charge: &ServiceCharge) -> Result<ServiceCharge> {
        // Phase rules run on create and update, before the write
        ServiceCharge::validate_phase_rules(
            charge.calculation_phase,
            charge.treatment_type,
            charge.taxable,
        )?;

        let result = sqlx::query(
            r#"
            INSERT INTO service_charges (
                name, percentage, amount_money, amount_currency, calculation_phase,
                treatment_type, taxable, reference_id, square_catalog_object_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&charge.name)
        .bind(charge.rate.percentage())
        .bind(charge.rate.fixed_amount().map(|m| m.amount))
        .bind(charge.rate.fixed_amount().map(|m| m.currency.to_string()))
        .bind(charge.calculation_phase)
        .bind(charge.treatment_type)
        .bind(charge.taxable)
        .bind(&charge.reference_id)
        .bind(&charge.square_catalog_object_id)
        .execute(&self.pool)
        .await?;

        self.find_service_charge(result.last_insert_id() as i64)
            .await
    }

    pub async fn update_service_charge(&self, charge: &ServiceCharge) -> Result<ServiceCharge> {
        let id = charge
            .id
            .ok_or_else(|| AppError::validation("Cannot update an unsaved service charge"))?;

        ServiceCharge::validate_phase_rules(
            charge.calculation_phase,
            charge.treatment_type,
            charge.taxable,
        )?;

        sqlx::query(
            r#"
            UPDATE service_charges SET
                name = ?, percentage = ?, amount_money = ?, amount_currency = ?,
                calculation_phase = ?, treatment_type = ?, taxable = ?,
                reference_id = ?, square_catalog_object_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&charge.name)
        .bind(charge.rate.percentage())
        .bind(charge.rate.fixed_amount().map(|m| m.amount))
        .bind(charge.rate.fixed_amount().map(|m| m.currency.to_string()))
        .bind(charge.calculation_phase)
        .bind(charge.treatment_type)
        .bind(charge.taxable)
        .bind(&charge.reference_id)
        .bind(&charge.square_catalog_object_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_service_charge(id).await
    }

    pub async fn find_service_charge(&self, id: i64) -> Result<ServiceCharge> {
        let row =
            sqlx::query_as::<_, ServiceChargeRow>("SELECT * FROM service_charges WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Service charge {}", id)))?;

        row.try_into()
    }

    /// Delete a deductible row and its pivot attachments.
    ///
    /// The pivot table is polymorphic, so its rows cannot cascade from a
    /// foreign key and are deleted here.
    pub async fn delete(&self, deductible: DeductibleRef) -> Result<()> {
        sqlx::query("DELETE FROM deductibles WHERE deductible_kind = ? AND deductible_id = ?")
            .bind(deductible.kind)
            .bind(deductible.id)
            .execute(&self.pool)
            .await?;

        let table = match deductible.kind {
            DeductibleKind::Tax => "taxes",
            DeductibleKind::Discount => "discounts",
            DeductibleKind::ServiceCharge => "service_charges",
        };
        sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table))
            .bind(deductible.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Attach a deductible to an order or line item with the given scope.
    ///
    /// Attach-time validation is deliberately permissive about service-charge
    /// phases; phase/scope compatibility is enforced by the calculation
    /// engine.
    pub async fn attach(&self, attachment: &DeductibleAttachment) -> Result<DeductibleAttachment> {
        let result = sqlx::query(
            r#"
            INSERT INTO deductibles (
                featurable_kind, featurable_id, deductible_kind, deductible_id, scope
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(attachment.featurable.kind)
        .bind(attachment.featurable.id)
        .bind(attachment.deductible.kind)
        .bind(attachment.deductible.id)
        .bind(attachment.scope)
        .execute(&self.pool)
        .await?;

        let mut created = attachment.clone();
        created.id = Some(result.last_insert_id() as i64);
        Ok(created)
    }

    pub async fn detach(&self, featurable: FeaturableRef, deductible: DeductibleRef) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM deductibles
            WHERE featurable_kind = ? AND featurable_id = ?
              AND deductible_kind = ? AND deductible_id = ?
            "#,
        )
        .bind(featurable.kind)
        .bind(featurable.id)
        .bind(deductible.kind)
        .bind(deductible.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All pivot rows attached to the given order or line item
    pub async fn attachments_for(
        &self,
        featurable: FeaturableRef,
    ) -> Result<Vec<DeductibleAttachment>> {
        let rows = sqlx::query_as::<_, AttachmentRow>(
            r#"
            SELECT * FROM deductibles
            WHERE featurable_kind = ? AND featurable_id = ?
            ORDER BY id
            "#,
        )
        .bind(featurable.kind)
        .bind(featurable.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DeductibleAttachment {
                id: Some(row.id),
                featurable: FeaturableRef {
                    kind: row.featurable_kind,
                    id: row.featurable_id,
                },
                deductible: DeductibleRef {
                    kind: row.deductible_kind,
                    id: row.deductible_id,
                },
                scope: row.scope,
                created_at: row.created_at,
            })
            .collect())
    }
}
