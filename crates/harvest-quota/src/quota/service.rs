use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use super::domain::{
    CropCycleCatalog, FarmerId, NewRegistration, Registration, RegistrationStatus,
};
use super::evaluation::{BucketLoad, QuotaConfig, QuotaDecision, QuotaPolicy};
use super::outcome::{BucketStatus, RegistrationOutcome};
use super::projection::{HarvestProjection, ProjectionError};
use super::repository::{CapacityStore, RegistrationStore, StoreError};

/// Decides whether a farmer may register a crop for the projected harvest
/// month, and records accepted registrations.
///
/// Each call reads the capacity and the current count, then inserts. Nothing
/// serializes that sequence, so concurrent calls against the same bucket can
/// both observe free seats and together overshoot the limit.
pub struct QuotaEvaluator<C, R> {
    capacities: Arc<C>,
    registrations: Arc<R>,
    catalog: Arc<CropCycleCatalog>,
    policy: QuotaPolicy,
}

impl<C, R> QuotaEvaluator<C, R>
where
    C: CapacityStore + 'static,
    R: RegistrationStore + 'static,
{
    pub fn new(capacities: Arc<C>, registrations: Arc<R>, config: QuotaConfig) -> Self {
        Self::with_catalog(
            capacities,
            registrations,
            CropCycleCatalog::standard(),
            config,
        )
    }

    pub fn with_catalog(
        capacities: Arc<C>,
        registrations: Arc<R>,
        catalog: CropCycleCatalog,
        config: QuotaConfig,
    ) -> Self {
        Self {
            capacities,
            registrations,
            catalog: Arc::new(catalog),
            policy: QuotaPolicy::new(config),
        }
    }

    pub fn catalog(&self) -> &CropCycleCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &QuotaConfig {
        self.policy.config()
    }

    /// Evaluate and, unless the bucket is full, persist a registration.
    ///
    /// Never fails: missing identity and store errors come back as
    /// [`RegistrationOutcome::Unauthenticated`] and [`RegistrationOutcome::Fault`].
    pub async fn check_and_register(
        &self,
        farmer_id: Option<&FarmerId>,
        crop_name: &str,
        planting_date: NaiveDate,
    ) -> RegistrationOutcome {
        let Some(farmer_id) = farmer_id else {
            warn!(crop = %crop_name, "registration attempted without a farmer identity");
            return RegistrationOutcome::Unauthenticated;
        };

        match self.register(farmer_id, crop_name, planting_date).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(crop = %crop_name, %planting_date, error = %err, "registration failed");
                RegistrationOutcome::Fault {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Current load of the bucket a planting would harvest into.
    pub async fn bucket_status(
        &self,
        crop_name: &str,
        planting_date: NaiveDate,
    ) -> Result<BucketStatus, QuotaServiceError> {
        let projection = self.project(crop_name, planting_date)?;
        let load = self.load_for(crop_name, &projection).await?;
        let decision = self.policy.decide(&load);

        Ok(BucketStatus {
            crop_name: crop_name.to_string(),
            harvest_date: projection.harvest_date,
            harvest_month: projection.harvest_month(),
            harvest_month_name: projection.harvest_month_name().to_string(),
            max_farmers: load.max_farmers,
            registered: load.registered,
            remaining: load.remaining(),
            utilization: load.utilization(),
            is_full: load.is_full(),
            tier: decision.tier(),
        })
    }

    pub async fn registrations_for(
        &self,
        crop_name: &str,
    ) -> Result<Vec<Registration>, QuotaServiceError> {
        Ok(self.registrations.list_by_crop(crop_name).await?)
    }

    /// Catalog crops, other than `crop_name`, whose bucket for the same
    /// planting date is still below the warning threshold.
    pub async fn open_alternatives(
        &self,
        crop_name: &str,
        planting_date: NaiveDate,
    ) -> Result<Vec<String>, QuotaServiceError> {
        let mut open = Vec::new();
        for candidate in self.catalog.crop_names() {
            if candidate == crop_name {
                continue;
            }
            let projection = self.project(candidate, planting_date)?;
            let load = self.load_for(candidate, &projection).await?;
            if self.policy.decide(&load) == QuotaDecision::Approve {
                open.push(candidate.to_string());
            }
        }
        Ok(open)
    }
}

impl<C, R> QuotaEvaluator<C, R>
where
    C: CapacityStore + 'static,
    R: RegistrationStore + 'static,
{
    async fn register(
        &self,
        farmer_id: &FarmerId,
        crop_name: &str,
        planting_date: NaiveDate,
    ) -> Result<RegistrationOutcome, QuotaServiceError> {
        let projection = self.project(crop_name, planting_date)?;
        let load = self.load_for(crop_name, &projection).await?;
        let harvest_month_name = projection.harvest_month_name().to_string();

        let status = match self.policy.decide(&load) {
            QuotaDecision::Reject => {
                warn!(
                    crop = %crop_name,
                    harvest_month = projection.harvest_month(),
                    registered = load.registered,
                    max_farmers = load.max_farmers,
                    "registration rejected, bucket full"
                );
                let alternatives = self.suggest_alternatives(crop_name, planting_date).await;
                return Ok(RegistrationOutcome::Rejected {
                    crop_name: crop_name.to_string(),
                    harvest_month_name,
                    load,
                    alternatives,
                });
            }
            QuotaDecision::Warn { .. } => RegistrationStatus::Warning,
            QuotaDecision::Approve => RegistrationStatus::Approved,
        };

        let registration = self
            .registrations
            .insert(NewRegistration {
                farmer_id: farmer_id.clone(),
                crop_name: crop_name.to_string(),
                planting_date,
                harvest_date: projection.harvest_date,
                status,
            })
            .await?;

        info!(
            crop = %crop_name,
            harvest_month = projection.harvest_month(),
            registered = load.registered,
            max_farmers = load.max_farmers,
            status = status.label(),
            registration_id = %registration.id.0,
            "registration recorded"
        );

        Ok(match status {
            RegistrationStatus::Approved => RegistrationOutcome::Approved {
                registration,
                harvest_month_name,
            },
            RegistrationStatus::Warning => RegistrationOutcome::Warning {
                registration,
                harvest_month_name,
                load,
            },
        })
    }

    fn project(
        &self,
        crop_name: &str,
        planting_date: NaiveDate,
    ) -> Result<HarvestProjection, ProjectionError> {
        HarvestProjection::for_crop(
            &self.catalog,
            crop_name,
            planting_date,
            self.config().default_cycle_months,
        )
    }

    async fn load_for(
        &self,
        crop_name: &str,
        projection: &HarvestProjection,
    ) -> Result<BucketLoad, StoreError> {
        let max_farmers = self
            .capacities
            .max_farmers(crop_name, projection.harvest_month())
            .await?
            .unwrap_or(self.config().default_max_farmers);

        let bucket = projection.bucket(self.config().bucket_by_year);
        let registered = self
            .registrations
            .count_in_bucket(crop_name, &bucket)
            .await?;

        Ok(BucketLoad {
            max_farmers,
            registered,
        })
    }

    async fn suggest_alternatives(&self, crop_name: &str, planting_date: NaiveDate) -> Vec<String> {
        match self.open_alternatives(crop_name, planting_date).await {
            Ok(alternatives) => alternatives,
            Err(err) => {
                warn!(crop = %crop_name, error = %err, "could not compute alternative crops");
                Vec::new()
            }
        }
    }
}

/// Error raised by the read-only evaluator queries.
#[derive(Debug, thiserror::Error)]
pub enum QuotaServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}
