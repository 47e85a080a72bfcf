//! Crop registration quota workflow.
//!
//! A registration projects the harvest month from the crop's growth cycle,
//! compares the registrations already counted against that month's capacity,
//! and approves, warns, or rejects. Accepted registrations are persisted with
//! their tier; rejections are not.

pub mod domain;
pub(crate) mod evaluation;
pub mod import;
pub mod outcome;
pub mod projection;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CapacityLimit, CropCycleCatalog, CropCycleEntry, FarmerId, HarvestBucket, NewRegistration,
    Registration, RegistrationId, RegistrationStatus,
};
pub use evaluation::{BucketLoad, QuotaConfig, QuotaDecision, QuotaPolicy, QuotaTier};
pub use import::{CapacityImportError, CapacityImporter};
pub use outcome::{BucketStatus, OutcomeKind, RegistrationOutcome, RegistrationResult, ResultStatus};
pub use projection::{HarvestProjection, ProjectionError};
pub use repository::{CapacityStore, RegistrationStore, StoreError};
pub use router::{quota_router, RegistrationRequest, FARMER_ID_HEADER};
pub use service::{QuotaEvaluator, QuotaServiceError};
