use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identity of the farmer making a registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FarmerId(pub String);

/// Identifier assigned by the registration store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(pub String);

/// Growth duration, in whole months, for each crop the advisory knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropCycleCatalog {
    cycles: BTreeMap<String, u32>,
}

impl CropCycleCatalog {
    /// The crops offered on the registration form.
    pub fn standard() -> Self {
        Self::default()
            .with_cycle("Carrot", 3)
            .with_cycle("Pumpkin", 4)
            .with_cycle("Green Chillies", 2)
            .with_cycle("Red Onions", 3)
            .with_cycle("Beans", 2)
            .with_cycle("Tomatoes", 3)
    }

    pub fn with_cycle(mut self, crop_name: impl Into<String>, months: u32) -> Self {
        self.cycles.insert(crop_name.into(), months);
        self
    }

    /// Cycle length for a known crop. Names are matched exactly.
    pub fn cycle_months(&self, crop_name: &str) -> Option<u32> {
        self.cycles.get(crop_name).copied()
    }

    pub fn crop_names(&self) -> impl Iterator<Item = &str> {
        self.cycles.keys().map(String::as_str)
    }

    pub fn entries(&self) -> Vec<CropCycleEntry> {
        self.cycles
            .iter()
            .map(|(crop_name, months)| CropCycleEntry {
                crop_name: crop_name.clone(),
                cycle_months: *months,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropCycleEntry {
    pub crop_name: String,
    pub cycle_months: u32,
}

/// Maximum number of farmers allowed to harvest a crop in a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLimit {
    pub crop_name: String,
    pub harvest_month: u32,
    pub max_farmers: u32,
}

/// Capacity accounting unit for a crop. The year is only part of the key when
/// year bucketing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HarvestBucket {
    pub harvest_month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvest_year: Option<i32>,
}

impl HarvestBucket {
    pub fn for_harvest(harvest_date: NaiveDate, by_year: bool) -> Self {
        Self {
            harvest_month: harvest_date.month(),
            harvest_year: by_year.then(|| harvest_date.year()),
        }
    }

    pub fn contains(&self, harvest_date: NaiveDate) -> bool {
        harvest_date.month() == self.harvest_month
            && self
                .harvest_year
                .map_or(true, |year| harvest_date.year() == year)
    }
}

/// Persisted tier of an accepted registration. Rejections are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Approved,
    Warning,
}

impl RegistrationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Warning => "warning",
        }
    }
}

/// Insert payload handed to the registration store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRegistration {
    pub farmer_id: FarmerId,
    pub crop_name: String,
    pub planting_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub status: RegistrationStatus,
}

/// A farmer's stored commitment to grow a crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub farmer_id: FarmerId,
    pub crop_name: String,
    pub planting_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    pub fn from_new(id: RegistrationId, new: NewRegistration, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            farmer_id: new.farmer_id,
            crop_name: new.crop_name,
            planting_date: new.planting_date,
            harvest_date: new.harvest_date,
            status: new.status,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn standard_catalog_lists_six_crops() {
        let catalog = CropCycleCatalog::standard();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.cycle_months("Pumpkin"), Some(4));
        assert_eq!(catalog.cycle_months("Green Chillies"), Some(2));
        assert_eq!(catalog.cycle_months("carrot"), None);
    }

    #[test]
    fn month_bucket_ignores_year() {
        let bucket = HarvestBucket::for_harvest(date(2025, 4, 15), false);
        assert!(bucket.contains(date(2025, 4, 1)));
        assert!(bucket.contains(date(2027, 4, 30)));
        assert!(!bucket.contains(date(2025, 5, 1)));
    }

    #[test]
    fn year_bucket_requires_matching_year() {
        let bucket = HarvestBucket::for_harvest(date(2025, 4, 15), true);
        assert_eq!(bucket.harvest_year, Some(2025));
        assert!(bucket.contains(date(2025, 4, 2)));
        assert!(!bucket.contains(date(2026, 4, 2)));
    }
}
