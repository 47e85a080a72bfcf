use serde::{Deserialize, Serialize};

use super::config::QuotaConfig;

/// Registrations already counted against a bucket, alongside its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketLoad {
    pub max_farmers: u32,
    pub registered: u32,
}

impl BucketLoad {
    pub fn remaining(&self) -> u32 {
        self.max_farmers.saturating_sub(self.registered)
    }

    /// Share of the capacity already taken. A zero capacity counts as saturated.
    pub fn utilization(&self) -> f64 {
        if self.max_farmers == 0 {
            return 1.0;
        }
        f64::from(self.registered) / f64::from(self.max_farmers)
    }

    /// Utilization as a whole percentage, rounded down.
    pub fn utilization_percent(&self) -> u64 {
        if self.max_farmers == 0 {
            return 100;
        }
        u64::from(self.registered) * 100 / u64::from(self.max_farmers)
    }

    pub fn is_full(&self) -> bool {
        self.registered >= self.max_farmers
    }
}

/// What the evaluator should do with a registration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum QuotaDecision {
    Approve,
    Warn { seats_remaining: u32 },
    Reject,
}

impl QuotaDecision {
    pub fn tier(&self) -> QuotaTier {
        match self {
            QuotaDecision::Approve => QuotaTier::Open,
            QuotaDecision::Warn { .. } => QuotaTier::HighRisk,
            QuotaDecision::Reject => QuotaTier::Full,
        }
    }
}

/// Traffic-light view of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaTier {
    Open,
    HighRisk,
    Full,
}

impl QuotaTier {
    pub const fn label(self) -> &'static str {
        match self {
            QuotaTier::Open => "open",
            QuotaTier::HighRisk => "high_risk",
            QuotaTier::Full => "full",
        }
    }
}

pub(crate) fn decide(load: &BucketLoad, config: &QuotaConfig) -> QuotaDecision {
    if load.is_full() {
        return QuotaDecision::Reject;
    }

    if load.utilization() >= config.warning_threshold {
        return QuotaDecision::Warn {
            seats_remaining: load.remaining(),
        };
    }

    QuotaDecision::Approve
}
