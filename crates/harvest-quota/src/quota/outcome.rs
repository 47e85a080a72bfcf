use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Registration, RegistrationId};
use super::evaluation::{BucketLoad, QuotaTier};

/// Result of a single `check_and_register` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Approved {
        registration: Registration,
        harvest_month_name: String,
    },
    Warning {
        registration: Registration,
        harvest_month_name: String,
        load: BucketLoad,
    },
    /// The bucket is full; nothing was stored.
    Rejected {
        crop_name: String,
        harvest_month_name: String,
        load: BucketLoad,
        alternatives: Vec<String>,
    },
    /// No farmer identity was supplied; no store was touched.
    Unauthenticated,
    /// A store read or write failed.
    Fault { message: String },
}

impl RegistrationOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            RegistrationOutcome::Approved { .. } => OutcomeKind::Approved,
            RegistrationOutcome::Warning { .. } => OutcomeKind::Warning,
            RegistrationOutcome::Rejected { .. } => OutcomeKind::Rejected,
            RegistrationOutcome::Unauthenticated => OutcomeKind::Unauthenticated,
            RegistrationOutcome::Fault { .. } => OutcomeKind::Fault,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            RegistrationOutcome::Approved { .. } | RegistrationOutcome::Warning { .. }
        )
    }

    pub fn registration(&self) -> Option<&Registration> {
        match self {
            RegistrationOutcome::Approved { registration, .. }
            | RegistrationOutcome::Warning { registration, .. } => Some(registration),
            _ => None,
        }
    }

    /// Collapses the outcome onto the approved/warning/error status the
    /// registration form renders.
    pub fn status(&self) -> ResultStatus {
        match self {
            RegistrationOutcome::Approved { .. } => ResultStatus::Approved,
            RegistrationOutcome::Warning { .. } => ResultStatus::Warning,
            _ => ResultStatus::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            RegistrationOutcome::Approved {
                registration,
                harvest_month_name,
            } => format!(
                "Safe! Good market opportunity for {} in {}.",
                registration.crop_name, harvest_month_name
            ),
            RegistrationOutcome::Warning { load, .. } => format!(
                "HIGH RISK! Market is {}% full. Only {} spots left. Prices might be lower than expected.",
                load.utilization_percent(),
                load.remaining()
            ),
            RegistrationOutcome::Rejected {
                crop_name,
                harvest_month_name,
                alternatives,
                ..
            } => {
                let mut message = format!(
                    "Market Full! 100% of seats taken for {crop_name} in {harvest_month_name}. Oversupply guaranteed."
                );
                if let Some(first) = alternatives.first() {
                    message.push_str(&format!(" Try planting {first} instead. Market is open."));
                }
                message
            }
            RegistrationOutcome::Unauthenticated => "Please login to register.".to_string(),
            RegistrationOutcome::Fault { message } => message.clone(),
        }
    }

    pub fn result(&self) -> RegistrationResult {
        let (harvest_month_name, harvest_date, seats_remaining, registration_id) = match self {
            RegistrationOutcome::Approved {
                registration,
                harvest_month_name,
            } => (
                Some(harvest_month_name.clone()),
                Some(registration.harvest_date),
                None,
                Some(registration.id.clone()),
            ),
            RegistrationOutcome::Warning {
                registration,
                harvest_month_name,
                load,
            } => (
                Some(harvest_month_name.clone()),
                Some(registration.harvest_date),
                Some(load.remaining()),
                Some(registration.id.clone()),
            ),
            RegistrationOutcome::Rejected {
                harvest_month_name, ..
            } => (Some(harvest_month_name.clone()), None, Some(0), None),
            RegistrationOutcome::Unauthenticated | RegistrationOutcome::Fault { .. } => {
                (None, None, None, None)
            }
        };

        let alternatives = match self {
            RegistrationOutcome::Rejected { alternatives, .. } => alternatives.clone(),
            _ => Vec::new(),
        };

        RegistrationResult {
            success: self.is_success(),
            status: self.status(),
            outcome: self.kind(),
            harvest_month_name,
            message: self.message(),
            harvest_date,
            seats_remaining,
            registration_id,
            alternatives,
        }
    }
}

/// Five-way tag distinguishing business rejections from faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Approved,
    Warning,
    Rejected,
    Unauthenticated,
    Fault,
}

/// Status understood by existing clients; rejections and faults share `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Approved,
    Warning,
    Error,
}

/// Wire view of a registration outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub success: bool,
    pub status: ResultStatus,
    pub outcome: OutcomeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harvest_month_name: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats_remaining: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<RegistrationId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

/// Read-only snapshot of a bucket for a prospective planting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStatus {
    pub crop_name: String,
    pub harvest_date: NaiveDate,
    pub harvest_month: u32,
    pub harvest_month_name: String,
    pub max_farmers: u32,
    pub registered: u32,
    pub remaining: u32,
    pub utilization: f64,
    pub is_full: bool,
    pub tier: QuotaTier,
}
