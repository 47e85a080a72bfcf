use serde::{Deserialize, Serialize};

/// Tunables for the quota decision. Defaults mirror the production constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Cycle length used for crops missing from the catalog.
    pub default_cycle_months: u32,
    /// Capacity used when no limit is stored for a crop and month.
    pub default_max_farmers: u32,
    /// Utilization at or above which registrations are accepted with a warning.
    pub warning_threshold: f64,
    /// Count registrations per (year, month) instead of calendar month alone.
    pub bucket_by_year: bool,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_cycle_months: 3,
            default_max_farmers: 50,
            warning_threshold: 0.8,
            bucket_by_year: false,
        }
    }
}
