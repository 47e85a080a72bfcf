mod config;
mod policy;

pub use config::QuotaConfig;
pub use policy::{BucketLoad, QuotaDecision, QuotaTier};

/// Stateless classifier applying the configured thresholds to a bucket load.
#[derive(Debug, Clone)]
pub struct QuotaPolicy {
    config: QuotaConfig,
}

impl QuotaPolicy {
    pub fn new(config: QuotaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuotaConfig {
        &self.config
    }

    pub fn decide(&self, load: &BucketLoad) -> QuotaDecision {
        policy::decide(load, &self.config)
    }
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::new(QuotaConfig::default())
    }
}
