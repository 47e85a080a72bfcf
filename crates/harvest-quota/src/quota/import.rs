use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::CapacityLimit;

#[derive(Debug, thiserror::Error)]
pub enum CapacityImportError {
    #[error("failed to read capacity limits: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid capacity CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("capacity row on line {line} has no crop name")]
    MissingCrop { line: u64 },
    #[error("capacity row on line {line} has harvest month {month} outside 1-12")]
    InvalidMonth { line: u64, month: u32 },
}

/// Loads `crop_name,harvest_month,max_farmers` exports of the limits table.
/// A later row for the same crop and month replaces an earlier one.
pub struct CapacityImporter;

impl CapacityImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CapacityLimit>, CapacityImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CapacityLimit>, CapacityImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut limits: BTreeMap<(String, u32), u32> = BTreeMap::new();

        for (index, record) in csv_reader.deserialize::<CapacityRow>().enumerate() {
            let row = record?;
            // header occupies line 1
            let line = index as u64 + 2;

            if row.crop_name.is_empty() {
                return Err(CapacityImportError::MissingCrop { line });
            }
            if !(1..=12).contains(&row.harvest_month) {
                return Err(CapacityImportError::InvalidMonth {
                    line,
                    month: row.harvest_month,
                });
            }

            limits.insert((row.crop_name, row.harvest_month), row.max_farmers);
        }

        Ok(limits
            .into_iter()
            .map(|((crop_name, harvest_month), max_farmers)| CapacityLimit {
                crop_name,
                harvest_month,
                max_farmers,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct CapacityRow {
    crop_name: String,
    harvest_month: u32,
    max_farmers: u32,
}
