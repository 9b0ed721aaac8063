pub mod models;
pub mod repositories;

pub use models::{
    AttachmentScope, CalculationPhase, DeductibleAttachment, DeductibleKind, DeductibleRate,
    DeductibleRef, Discount, FeaturableKind, FeaturableRef, ServiceCharge, Tax, TaxInclusionType,
    TreatmentType,
};
