use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{error, info};

use sales_sample::config::{Config, FailurePolicy, StorageConfig, DEFAULT_ENDPOINT, DEFAULT_REGION};
use sales_sample::driver::BatchDriver;
use sales_sample::storage::{DirectoryUploader, S3Client, Uploader};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Year the sample data is dated in
    #[clap(long, env = "SALES_SAMPLE_YEAR", default_value_t = 2025)]
    pub(crate) year: i32,
    /// Records generated per system and month
    #[clap(long, env = "SALES_SAMPLE_ROWS", default_value_t = 100)]
    pub(crate) rows: usize,
    /// Generate months 1 through this value (at most 12)
    #[clap(long, env = "SALES_SAMPLE_MONTHS", default_value_t = 12)]
    pub(crate) months: u32,
    /// Directory the CSV files are written to
    #[clap(long, env = "SALES_SAMPLE_OUTPUT_DIR", default_value = "sample")]
    pub(crate) output_dir: PathBuf,
    /// Seed for reproducible output
    #[clap(long, env = "SALES_SAMPLE_SEED")]
    pub(crate) seed: Option<u64>,
    /// Keep going with the next system and month after a failure
    #[clap(long)]
    pub(crate) keep_going: bool,
    /// Copy files into this directory instead of uploading them
    #[clap(long, value_name = "DIR")]
    pub(crate) dry_run: Option<PathBuf>,
    /// Object storage endpoint
    #[clap(long, env = "SALES_SAMPLE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub(crate) endpoint: String,
    /// Bucket uploads go to, required unless `--dry-run` is given
    #[clap(long, env = "SALES_SAMPLE_BUCKET")]
    pub(crate) bucket: Option<String>,
    #[clap(long, env = "SALES_SAMPLE_REGION", default_value = DEFAULT_REGION)]
    pub(crate) region: String,
    #[clap(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true, default_value = "")]
    pub(crate) access_key_id: String,
    #[clap(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true, default_value = "")]
    pub(crate) secret_access_key: String,
    /// Upload timeout in seconds, none by default
    #[clap(long)]
    pub(crate) timeout_secs: Option<u64>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            year: self.year,
            rows_per_month: self.rows,
            months: self.months,
            output_dir: self.output_dir.clone(),
            seed: self.seed,
            failure_policy: if self.keep_going {
                FailurePolicy::Continue
            } else {
                FailurePolicy::Abort
            },
        }
    }

    fn uploader(&self) -> Result<Box<dyn Uploader>, Box<dyn Error>> {
        if let Some(dir) = &self.dry_run {
            return Ok(Box::new(DirectoryUploader::new(dir)));
        }
        let bucket = self
            .bucket
            .clone()
            .ok_or("a bucket is required unless --dry-run is given")?;
        let storage = StorageConfig {
            endpoint: self.endpoint.clone(),
            bucket,
            region: self.region.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        };
        Ok(Box::new(S3Client::new(&storage)?))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut driver = BatchDriver::new(cli.config(), cli.uploader()?)?;
    let report = driver.run()?;

    info!(
        "wrote and uploaded {} files, next sequences {:?}",
        report.outputs.len(),
        driver.next_sequences()
    );
    if !report.is_complete() {
        for failure in &report.failures {
            error!("{failure}");
        }
        return Err(format!("{} step(s) failed", report.failures.len()).into());
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cli_to_config() {
        let cli = Cli::try_parse_from([
            "sales-sample-cli",
            "--months",
            "3",
            "--rows",
            "5",
            "--seed",
            "9",
            "--keep-going",
            "--dry-run",
            "out",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(config.months, 3);
        assert_eq!(config.rows_per_month, 5);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert!(cli.uploader().is_ok());
    }

    #[test]
    fn test_bucket_required_for_upload() {
        let cli = Cli::try_parse_from(["sales-sample-cli", "--bucket", ""]).unwrap();
        assert!(cli.uploader().is_err());
    }
}
