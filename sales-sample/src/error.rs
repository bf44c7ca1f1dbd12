use std::fmt;
use std::io;

use thiserror::Error;

use crate::SourceSystem;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("I/O Error: {0}")]
    IoError(#[from] io::Error),
    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),
    #[error("Month must be within 1-12, got {0}")]
    InvalidMonth(u32),
    #[error("Year {0} cannot be represented as a calendar date")]
    InvalidYear(i32),
    #[error("Sequence numbers start at 1")]
    InvalidSequenceStart,
    #[error("Reserving {count} sequence numbers from {start} overflows")]
    SequenceOverflow { start: u64, count: usize },
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),
    #[error("Invalid product catalog: {0}")]
    InvalidCatalog(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("could not read local file: {0}")]
    Io(#[from] io::Error),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("storage rejected the upload with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("invalid storage configuration: {0}")]
    Config(String),
}

/// The step of a month's work that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Write,
    Upload,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Generate => f.write_str("generate"),
            Stage::Write => f.write_str("write"),
            Stage::Upload => f.write_str("upload"),
        }
    }
}

/// A failed (system, month) unit of a batch run, tagged with the stage that failed.
#[derive(Error, Debug)]
#[error("{system} {year}-{month:02}: {stage} failed: {source}")]
pub struct BatchError {
    pub system: SourceSystem,
    pub year: i32,
    pub month: u32,
    pub stage: Stage,
    pub source: GenError,
}
