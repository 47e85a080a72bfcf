use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tokio::sync::Barrier;

use crate::quota::domain::{
    FarmerId, HarvestBucket, NewRegistration, Registration, RegistrationId,
};
use crate::quota::repository::{CapacityStore, RegistrationStore, StoreError};
use crate::quota::{QuotaConfig, QuotaEvaluator};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn farmer(suffix: &str) -> FarmerId {
    FarmerId(format!("farmer-{suffix}"))
}

pub(super) fn quota_config() -> QuotaConfig {
    QuotaConfig::default()
}

pub(super) fn build_evaluator(
    capacities: MemoryCapacities,
) -> (
    QuotaEvaluator<MemoryCapacities, MemoryRegistrations>,
    Arc<MemoryCapacities>,
    Arc<MemoryRegistrations>,
) {
    let capacities = Arc::new(capacities);
    let registrations = Arc::new(MemoryRegistrations::default());
    let evaluator =
        QuotaEvaluator::new(capacities.clone(), registrations.clone(), quota_config());
    (evaluator, capacities, registrations)
}

/// Capacity limits keyed by crop and month, counting every lookup.
#[derive(Default)]
pub(super) struct MemoryCapacities {
    limits: Mutex<HashMap<(String, u32), u32>>,
    reads: AtomicUsize,
}

impl MemoryCapacities {
    pub(super) fn with_limit(self, crop_name: &str, harvest_month: u32, max_farmers: u32) -> Self {
        self.limits
            .lock()
            .expect("capacity mutex poisoned")
            .insert((crop_name.to_string(), harvest_month), max_farmers);
        self
    }

    pub(super) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapacityStore for MemoryCapacities {
    async fn max_farmers(
        &self,
        crop_name: &str,
        harvest_month: u32,
    ) -> Result<Option<u32>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let guard = self.limits.lock().expect("capacity mutex poisoned");
        Ok(guard.get(&(crop_name.to_string(), harvest_month)).copied())
    }
}

/// Registration store relying on the default client-side bucket count.
#[derive(Default)]
pub(super) struct MemoryRegistrations {
    records: Mutex<Vec<Registration>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryRegistrations {
    pub(super) fn records(&self) -> Vec<Registration> {
        self.records
            .lock()
            .expect("registration mutex poisoned")
            .clone()
    }

    pub(super) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(super) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Seeds existing registrations harvesting on `harvest_date`.
    pub(super) fn seed(&self, crop_name: &str, harvest_date: NaiveDate, count: usize) {
        let mut guard = self.records.lock().expect("registration mutex poisoned");
        for _ in 0..count {
            let id = RegistrationId(format!("seed-{:04}", guard.len() + 1));
            guard.push(Registration {
                id,
                farmer_id: FarmerId("seeded".to_string()),
                crop_name: crop_name.to_string(),
                planting_date: harvest_date,
                harvest_date,
                status: crate::quota::RegistrationStatus::Approved,
                created_at: Utc::now(),
            });
        }
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrations {
    async fn list_by_crop(&self, crop_name: &str) -> Result<Vec<Registration>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let guard = self.records.lock().expect("registration mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.crop_name == crop_name)
            .cloned()
            .collect())
    }

    async fn insert(&self, registration: NewRegistration) -> Result<Registration, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.records.lock().expect("registration mutex poisoned");
        let id = RegistrationId(format!("reg-{:04}", guard.len() + 1));
        let stored = Registration::from_new(id, registration, Utc::now());
        guard.push(stored.clone());
        Ok(stored)
    }
}

pub(super) struct UnavailableCapacities;

#[async_trait]
impl CapacityStore for UnavailableCapacities {
    async fn max_farmers(
        &self,
        _crop_name: &str,
        _harvest_month: u32,
    ) -> Result<Option<u32>, StoreError> {
        Err(StoreError::Unavailable("capacity table offline".to_string()))
    }
}

/// Serves a single crop's limit and fails every other lookup.
pub(super) struct SingleCropCapacities {
    crop_name: String,
    max_farmers: u32,
}

impl SingleCropCapacities {
    pub(super) fn new(crop_name: &str, max_farmers: u32) -> Self {
        Self {
            crop_name: crop_name.to_string(),
            max_farmers,
        }
    }
}

#[async_trait]
impl CapacityStore for SingleCropCapacities {
    async fn max_farmers(
        &self,
        crop_name: &str,
        _harvest_month: u32,
    ) -> Result<Option<u32>, StoreError> {
        if crop_name == self.crop_name {
            Ok(Some(self.max_farmers))
        } else {
            Err(StoreError::Unavailable(format!("no capacity shard for {crop_name}")))
        }
    }
}

/// Reads succeed with an empty bucket; every insert fails.
pub(super) struct ReadOnlyRegistrations;

#[async_trait]
impl RegistrationStore for ReadOnlyRegistrations {
    async fn list_by_crop(&self, _crop_name: &str) -> Result<Vec<Registration>, StoreError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _registration: NewRegistration) -> Result<Registration, StoreError> {
        Err(StoreError::Rejected("read only replica".to_string()))
    }
}

/// Holds every count until `parties` callers have read the bucket, so each of
/// them sees the load from before any insert.
pub(super) struct GatedRegistrations {
    inner: MemoryRegistrations,
    gate: Barrier,
}

impl GatedRegistrations {
    pub(super) fn new(parties: usize) -> Self {
        Self {
            inner: MemoryRegistrations::default(),
            gate: Barrier::new(parties),
        }
    }

    pub(super) fn inner(&self) -> &MemoryRegistrations {
        &self.inner
    }
}

#[async_trait]
impl RegistrationStore for GatedRegistrations {
    async fn list_by_crop(&self, crop_name: &str) -> Result<Vec<Registration>, StoreError> {
        self.inner.list_by_crop(crop_name).await
    }

    async fn count_in_bucket(
        &self,
        crop_name: &str,
        bucket: &HarvestBucket,
    ) -> Result<u32, StoreError> {
        let count = self.inner.count_in_bucket(crop_name, bucket).await?;
        self.gate.wait().await;
        Ok(count)
    }

    async fn insert(&self, registration: NewRegistration) -> Result<Registration, StoreError> {
        self.inner.insert(registration).await
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
