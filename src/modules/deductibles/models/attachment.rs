use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The concrete type of a deductible row, used as the pivot discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeductibleKind {
    Tax,
    Discount,
    ServiceCharge,
}

/// The entity a deductible is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeaturableKind {
    Order,
    LineItem,
}

/// The granularity at which an attached deductible applies.
///
/// Recorded on the pivot row at attach time, so a deductible's default scope
/// can be overridden per attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentScope {
    Order,
    LineItem,
    ServiceCharge,
}

impl std::fmt::Display for AttachmentScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachmentScope::Order => write!(f, "ORDER"),
            AttachmentScope::LineItem => write!(f, "LINE_ITEM"),
            AttachmentScope::ServiceCharge => write!(f, "SERVICE_CHARGE"),
        }
    }
}

/// A typed reference to a deductible row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeductibleRef {
    pub kind: DeductibleKind,
    pub id: i64,
}

impl DeductibleRef {
    pub fn tax(id: i64) -> Self {
        Self {
            kind: DeductibleKind::Tax,
            id,
        }
    }

    pub fn discount(id: i64) -> Self {
        Self {
            kind: DeductibleKind::Discount,
            id,
        }
    }

    pub fn service_charge(id: i64) -> Self {
        Self {
            kind: DeductibleKind::ServiceCharge,
            id,
        }
    }
}

/// A typed reference to the entity a deductible is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeaturableRef {
    pub kind: FeaturableKind,
    pub id: i64,
}

impl FeaturableRef {
    pub fn order(id: i64) -> Self {
        Self {
            kind: FeaturableKind::Order,
            id,
        }
    }

    pub fn line_item(id: i64) -> Self {
        Self {
            kind: FeaturableKind::LineItem,
            id,
        }
    }
}

/// One row of the polymorphic deductible pivot table.
///
/// Attaching is permissive: phase/scope compatibility for service charges is
/// re-checked at calculation time, so a provisional attachment that is not
/// yet computable is allowed to exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductibleAttachment {
    pub id: Option<i64>,
    pub featurable: FeaturableRef,
    pub deductible: DeductibleRef,
    pub scope: AttachmentScope,
    pub created_at: Option<DateTime<Utc>>,
}

impl DeductibleAttachment {
    pub fn new(
        featurable: FeaturableRef,
        deductible: DeductibleRef,
        scope: AttachmentScope,
    ) -> Self {
        Self {
            id: None,
            featurable,
            deductible,
            scope,
            created_at: None,
        }
    }
}
