use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// DatasetError – validation failures while building a dataset
// ---------------------------------------------------------------------------

/// Reasons a launch dataset is rejected at load time.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("dataset contains no launch records")]
    Empty,

    #[error("row {row}: payload mass {value} is not a non-negative number")]
    InvalidPayload { row: usize, value: f64 },

    #[error("row {row}: outcome class {value} is neither 0 nor 1")]
    InvalidOutcome { row: usize, value: f64 },

    #[error("missing required column '{0}'")]
    MissingColumn(String),
}

// ---------------------------------------------------------------------------
// Outcome – the binary launch result
// ---------------------------------------------------------------------------

/// Launch outcome class as stored in the `class` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Interpret a raw class value. Accepts integral floats (`1.0`) because
    /// pandas exports frequently widen the column.
    pub fn from_class(value: f64, row: usize) -> Result<Self, DatasetError> {
        if value == 0.0 {
            Ok(Outcome::Failure)
        } else if value == 1.0 {
            Ok(Outcome::Success)
        } else {
            Err(DatasetError::InvalidOutcome { row, value })
        }
    }

    /// Numeric class: 0 = failure, 1 = success.
    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub site: String,
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: String,
}

impl LaunchRecord {
    /// Build a record, validating payload and outcome. `row` is only used in
    /// error messages.
    pub fn new(
        row: usize,
        site: impl Into<String>,
        payload_mass_kg: f64,
        class: f64,
        booster_version_category: impl Into<String>,
    ) -> Result<Self, DatasetError> {
        if !payload_mass_kg.is_finite() || payload_mass_kg < 0.0 {
            return Err(DatasetError::InvalidPayload {
                row,
                value: payload_mass_kg,
            });
        }
        Ok(LaunchRecord {
            site: site.into(),
            payload_mass_kg,
            outcome: Outcome::from_class(class, row)?,
            booster_version_category: booster_version_category.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices. Never mutated after
/// construction; shared with callbacks behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Distinct sites in first-appearance order.
    sites: Vec<String>,
    /// Distinct booster categories, sorted.
    booster_categories: Vec<String>,
    /// Observed (min, max) payload mass.
    payload_bounds: (f64, f64),
}

impl LaunchDataset {
    /// Build indices from the loaded records. An empty record list is
    /// rejected since the payload slider needs observed bounds.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut sites: Vec<String> = Vec::new();
        let mut categories: BTreeSet<String> = BTreeSet::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for rec in &records {
            if !sites.contains(&rec.site) {
                sites.push(rec.site.clone());
            }
            categories.insert(rec.booster_version_category.clone());
            min = min.min(rec.payload_mass_kg);
            max = max.max(rec.payload_mass_kg);
        }

        Ok(LaunchDataset {
            records,
            sites,
            booster_categories: categories.into_iter().collect(),
            payload_bounds: (min, max),
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn booster_categories(&self) -> &[String] {
        &self.booster_categories
    }

    /// Observed `(min, max)` payload mass in kg.
    pub fn payload_bounds(&self) -> (f64, f64) {
        self.payload_bounds
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
