use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use harvest_quota::error::AppError;
use harvest_quota::quota::{
    CapacityImporter, CapacityLimit, CapacityStore, HarvestBucket, NewRegistration, QuotaConfig,
    Registration, RegistrationId, RegistrationStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCapacityStore {
    limits: Arc<Mutex<HashMap<(String, u32), u32>>>,
}

impl InMemoryCapacityStore {
    pub(crate) fn from_limits(limits: Vec<CapacityLimit>) -> Self {
        let store = Self::default();
        for limit in limits {
            store.set_limit(&limit.crop_name, limit.harvest_month, limit.max_farmers);
        }
        store
    }

    /// Seeds from a limits CSV when a path is configured.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Ok(Self::from_limits(CapacityImporter::from_path(path)?)),
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn set_limit(&self, crop_name: &str, harvest_month: u32, max_farmers: u32) {
        let mut guard = self.limits.lock().expect("capacity mutex poisoned");
        guard.insert((crop_name.to_string(), harvest_month), max_farmers);
    }
}

#[async_trait]
impl CapacityStore for InMemoryCapacityStore {
    async fn max_farmers(
        &self,
        crop_name: &str,
        harvest_month: u32,
    ) -> Result<Option<u32>, StoreError> {
        let guard = self.limits.lock().expect("capacity mutex poisoned");
        Ok(guard.get(&(crop_name.to_string(), harvest_month)).copied())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRegistrationStore {
    records: Arc<Mutex<Vec<Registration>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryRegistrationStore {
    fn next_id(&self) -> RegistrationId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        RegistrationId(format!("reg-{id:06}"))
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn list_by_crop(&self, crop_name: &str) -> Result<Vec<Registration>, StoreError> {
        let guard = self.records.lock().expect("registration mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.crop_name == crop_name)
            .cloned()
            .collect())
    }

    async fn count_in_bucket(
        &self,
        crop_name: &str,
        bucket: &HarvestBucket,
    ) -> Result<u32, StoreError> {
        let guard = self.records.lock().expect("registration mutex poisoned");
        let count = guard
            .iter()
            .filter(|record| record.crop_name == crop_name && bucket.contains(record.harvest_date))
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn insert(&self, registration: NewRegistration) -> Result<Registration, StoreError> {
        let record = Registration::from_new(self.next_id(), registration, Utc::now());
        let mut guard = self.records.lock().expect("registration mutex poisoned");
        guard.push(record.clone());
        Ok(record)
    }
}

pub(crate) fn quota_config_with_default(
    mut config: QuotaConfig,
    default_max_farmers: Option<u32>,
) -> QuotaConfig {
    if let Some(max_farmers) = default_max_farmers {
        config.default_max_farmers = max_farmers;
    }
    config
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
