#![deny(rust_2018_idioms)]
#![deny(clippy::correctness)]
#![deny(clippy::perf)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod billing;
pub mod catalog;
pub mod config;
pub mod dates;
pub mod driver;
pub mod error;
pub mod output;
pub mod record;
pub mod sales;
pub mod sequence;
pub mod sigv4;
pub mod storage;
pub mod weighted;

use std::fmt;

/// The mock source systems that sample data is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceSystem {
    SalesSys1,
    SalesSys2,
}

impl SourceSystem {
    /// Name used in file names and object keys.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SourceSystem::SalesSys1 => "sales_sys1",
            SourceSystem::SalesSys2 => "sales_sys2",
        }
    }

    /// Prefix of the management numbers this system hands out.
    #[must_use]
    pub fn sequence_prefix(self) -> char {
        match self {
            SourceSystem::SalesSys1 => 'A',
            SourceSystem::SalesSys2 => 'B',
        }
    }
}

impl fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
