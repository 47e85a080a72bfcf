use async_trait::async_trait;

use super::domain::{HarvestBucket, NewRegistration, Registration};

/// Read access to the per-crop, per-month capacity limits.
#[async_trait]
pub trait CapacityStore: Send + Sync {
    /// Stored limit for the crop and calendar month, if an administrator set one.
    async fn max_farmers(
        &self,
        crop_name: &str,
        harvest_month: u32,
    ) -> Result<Option<u32>, StoreError>;
}

/// Append-only access to farmer registrations.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn list_by_crop(&self, crop_name: &str) -> Result<Vec<Registration>, StoreError>;

    /// Registrations for the crop whose harvest falls inside the bucket.
    ///
    /// The default implementation filters [`RegistrationStore::list_by_crop`];
    /// stores that can count server-side should override it.
    async fn count_in_bucket(
        &self,
        crop_name: &str,
        bucket: &HarvestBucket,
    ) -> Result<u32, StoreError> {
        let registrations = self.list_by_crop(crop_name).await?;
        let count = registrations
            .iter()
            .filter(|registration| bucket.contains(registration.harvest_date))
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn insert(&self, registration: NewRegistration) -> Result<Registration, StoreError>;
}

/// Failure reported by an external store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store rejected the request: {0}")]
    Rejected(String),
}
