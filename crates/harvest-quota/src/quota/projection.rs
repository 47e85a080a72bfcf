use chrono::{Datelike, Duration, Month, NaiveDate};
use serde::Serialize;

use super::domain::{CropCycleCatalog, HarvestBucket};

/// Expected harvest for a planting, derived from the crop's growth cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HarvestProjection {
    pub planting_date: NaiveDate,
    pub cycle_months: u32,
    pub harvest_date: NaiveDate,
}

impl HarvestProjection {
    /// Projects a harvest, falling back to `default_cycle_months` for crops
    /// missing from the catalog.
    pub fn for_crop(
        catalog: &CropCycleCatalog,
        crop_name: &str,
        planting_date: NaiveDate,
        default_cycle_months: u32,
    ) -> Result<Self, ProjectionError> {
        let cycle_months = catalog
            .cycle_months(crop_name)
            .unwrap_or(default_cycle_months);
        let harvest_date =
            add_months(planting_date, cycle_months).ok_or(ProjectionError::OutOfRange {
                planting_date,
                cycle_months,
            })?;

        Ok(Self {
            planting_date,
            cycle_months,
            harvest_date,
        })
    }

    pub fn harvest_month(&self) -> u32 {
        self.harvest_date.month()
    }

    pub fn harvest_month_name(&self) -> &'static str {
        month_name(self.harvest_month())
    }

    pub fn bucket(&self, by_year: bool) -> HarvestBucket {
        HarvestBucket::for_harvest(self.harvest_date, by_year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("harvest date for {planting_date} plus {cycle_months} months is out of range")]
    OutOfRange {
        planting_date: NaiveDate,
        cycle_months: u32,
    },
}

/// Calendar month addition where days past the end of the target month carry
/// into the following month (31 January + 1 month is 3 March in a common year).
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.month0().checked_add(months)?;
    let year = date.year().checked_add(i32::try_from(total / 12).ok()?)?;
    let first_of_month = NaiveDate::from_ymd_opt(year, total % 12 + 1, 1)?;
    first_of_month.checked_add_signed(Duration::days(i64::from(date.day0())))
}

/// English month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .map(|month| month.name())
        .unwrap_or("Unknown")
}
