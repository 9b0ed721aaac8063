pub mod attachment;
pub mod discount;
pub mod rate;
pub mod service_charge;
pub mod tax;

pub use attachment::{
    AttachmentScope, DeductibleAttachment, DeductibleKind, DeductibleRef, FeaturableKind,
    FeaturableRef,
};
pub use discount::Discount;
pub use rate::DeductibleRate;
pub use service_charge::{CalculationPhase, ServiceCharge, TreatmentType};
pub use tax::{Tax, TaxInclusionType};
