use std::path::PathBuf;
use std::time::Duration;

use crate::error::GenError;

pub const DEFAULT_YEAR: i32 = 2025;
pub const DEFAULT_ROWS_PER_MONTH: usize = 100;
/// Months 1 through 12 of the target year
pub const DEFAULT_MONTHS: u32 = 12;
pub const DEFAULT_OUTPUT_DIR: &str = "sample";
pub const DEFAULT_ENDPOINT: &str = "https://s3.isk01.sakurastorage.jp";
pub const DEFAULT_REGION: &str = "jp-north-1";

/// What the batch driver does when one system's month fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run at the first failure
    #[default]
    Abort,
    /// Record the failure and carry on with the next system and month
    Continue,
}

/// Where and how to reach the object store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// `None` leaves uploads without a timeout
    pub timeout: Option<Duration>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bucket: String::new(),
            region: DEFAULT_REGION.to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub year: i32,
    pub rows_per_month: usize,
    /// Generate months `1..=months` of `year`
    pub months: u32,
    pub output_dir: PathBuf,
    /// Fixed seed for reproducible output; entropy seeded when `None`
    pub seed: Option<u64>,
    pub failure_policy: FailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            year: DEFAULT_YEAR,
            rows_per_month: DEFAULT_ROWS_PER_MONTH,
            months: DEFAULT_MONTHS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            seed: None,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl Config {
    /// # Errors
    /// Errors when the month count is outside 1-12, no rows are requested, or the year has
    /// no representable calendar dates
    pub fn validate(&self) -> Result<(), GenError> {
        if !(1..=12).contains(&self.months) {
            return Err(GenError::InvalidConfig(format!(
                "months must be between 1 and 12, got {}",
                self.months
            )));
        }
        if self.rows_per_month == 0 {
            return Err(GenError::InvalidConfig(
                "rows per month must be at least 1".to_string(),
            ));
        }
        crate::dates::month_bounds(self.year, self.months)
            .map_err(|e| GenError::InvalidConfig(e.to_string()))?;
        Ok(())
    }
}
