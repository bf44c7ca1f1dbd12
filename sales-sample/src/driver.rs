//! Month by month batch run: generate, write locally, upload, for each source system.

use std::path::PathBuf;

use log::{error, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::billing::BillingGenerator;
use crate::catalog::PriceCatalog;
use crate::config::{Config, FailurePolicy};
use crate::error::{BatchError, GenError, Stage};
use crate::output;
use crate::record::RecordGenerator;
use crate::sales::SalesGenerator;
use crate::sequence::{format_mgmt_no, SequenceCounter};
use crate::storage::{self, Uploader};
use crate::SourceSystem;

/// One (system, month) file that was written and uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOutput {
    pub system: SourceSystem,
    pub year: i32,
    pub month: u32,
    pub local_path: PathBuf,
    pub key: String,
    pub rows: usize,
    pub first_mgmt_no: String,
    pub last_mgmt_no: String,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outputs: Vec<MonthOutput>,
    /// Only populated under [`FailurePolicy::Continue`]
    pub failures: Vec<BatchError>,
}

impl RunReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(
        &mut self,
        result: Result<MonthOutput, BatchError>,
        policy: FailurePolicy,
    ) -> Result<(), BatchError> {
        match result {
            Ok(output) => self.outputs.push(output),
            Err(e) => match policy {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Continue => {
                    error!("{e}");
                    self.failures.push(e);
                }
            },
        }
        Ok(())
    }
}

/// Owns the run configuration, the upload client and both sequence counters.
///
/// Counters only move forward. A failed write or upload does not give its numbers back.
pub struct BatchDriver<U> {
    config: Config,
    catalog: PriceCatalog,
    uploader: U,
    rng: Pcg64Mcg,
    sales: SalesGenerator,
    billing: BillingGenerator,
    sales_seq: SequenceCounter,
    billing_seq: SequenceCounter,
}

/// Everything a single (system, month) step reads but does not change.
struct MonthJob<'a, U> {
    config: &'a Config,
    catalog: &'a PriceCatalog,
    uploader: &'a U,
    month: u32,
}

impl<U: Uploader> MonthJob<'_, U> {
    fn fail(&self, system: SourceSystem, stage: Stage, source: impl Into<GenError>) -> BatchError {
        BatchError {
            system,
            year: self.config.year,
            month: self.month,
            stage,
            source: source.into(),
        }
    }

    fn run<G: RecordGenerator, R: Rng>(
        &self,
        generator: &G,
        counter: &mut SequenceCounter,
        rng: &mut R,
    ) -> Result<MonthOutput, BatchError> {
        let system = generator.system();
        let year = self.config.year;
        let first = counter.peek();

        let records = generator
            .generate(
                rng,
                self.catalog,
                year,
                self.month,
                self.config.rows_per_month,
                counter,
            )
            .map_err(|e| self.fail(system, Stage::Generate, e))?;
        let last = counter.peek().saturating_sub(1);

        let file_name = output::file_name(system, year, self.month);
        let local_path = output::write_csv(&self.config.output_dir, &file_name, &records)
            .map_err(|e| self.fail(system, Stage::Write, e))?;
        info!("saved local: {}", local_path.display());

        let key = storage::object_key(system, year, self.month);
        self.uploader
            .upload(&local_path, &key)
            .map_err(|e| self.fail(system, Stage::Upload, e))?;
        info!("uploaded: {}", self.uploader.describe(&key));

        Ok(MonthOutput {
            system,
            year,
            month: self.month,
            local_path,
            key,
            rows: records.len(),
            first_mgmt_no: format_mgmt_no(counter.prefix(), first),
            last_mgmt_no: format_mgmt_no(counter.prefix(), last),
        })
    }
}

impl<U: Uploader> BatchDriver<U> {
    /// # Errors
    /// Errors when `config` does not validate
    pub fn new(config: Config, uploader: U) -> Result<Self, GenError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed),
            None => Pcg64Mcg::from_entropy(),
        };
        Ok(BatchDriver {
            config,
            catalog: PriceCatalog::default(),
            uploader,
            rng,
            sales: SalesGenerator::new()?,
            billing: BillingGenerator::new()?,
            sales_seq: SequenceCounter::new(SourceSystem::SalesSys1.sequence_prefix()),
            billing_seq: SequenceCounter::new(SourceSystem::SalesSys2.sequence_prefix()),
        })
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: PriceCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Next System1 and System2 sequence values.
    #[must_use]
    pub fn next_sequences(&self) -> (u64, u64) {
        (self.sales_seq.peek(), self.billing_seq.peek())
    }

    /// Runs every configured month in order, System1 before System2 within a month.
    ///
    /// # Errors
    /// Under [`FailurePolicy::Abort`], the first failed step. Files already uploaded stay
    /// in place and the failed month's local file, if written, is left on disk.
    pub fn run(&mut self) -> Result<RunReport, BatchError> {
        let policy = self.config.failure_policy;
        let mut report = RunReport::default();

        for month in 1..=self.config.months {
            let job = MonthJob {
                config: &self.config,
                catalog: &self.catalog,
                uploader: &self.uploader,
                month,
            };

            let result = job.run(&self.sales, &mut self.sales_seq, &mut self.rng);
            report.record(result, policy)?;
            let result = job.run(&self.billing, &mut self.billing_seq, &mut self.rng);
            report.record(result, policy)?;
        }

        Ok(report)
    }
}
