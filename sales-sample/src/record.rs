use std::ops::Range;

use chrono::NaiveDateTime;
use rand::Rng;
use rust_decimal::prelude::*;
use serde::{Serialize, Serializer};

use crate::catalog::PriceCatalog;
use crate::error::GenError;
use crate::sequence::SequenceCounter;
use crate::SourceSystem;

/// Customer ids are drawn uniformly from this range
pub const CUSTOMER_IDS: Range<u32> = 1000..1100;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Produces one month of records for a single source system.
pub trait RecordGenerator {
    type Record: Serialize;

    fn system(&self) -> SourceSystem;

    /// Generates `n` records dated within `month` of `year`, numbering them from `counter`.
    /// The counter is only advanced when generation succeeds.
    ///
    /// # Errors
    /// Errors when `month` is outside 1-12 or `year` cannot be represented
    fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        catalog: &PriceCatalog,
        year: i32,
        month: u32,
        n: usize,
        counter: &mut SequenceCounter,
    ) -> Result<Vec<Self::Record>, GenError>;

    /// Same as [`generate`](Self::generate) with the counter threaded through as a plain
    /// input/output pair: returns the records and the next starting sequence number.
    ///
    /// # Errors
    /// Errors when `start_seq` is 0, or for the reasons [`generate`](Self::generate) does
    fn generate_from<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        catalog: &PriceCatalog,
        year: i32,
        month: u32,
        n: usize,
        start_seq: u64,
    ) -> Result<(Vec<Self::Record>, u64), GenError> {
        let mut counter = SequenceCounter::starting_at(self.system().sequence_prefix(), start_seq)?;
        let records = self.generate(rng, catalog, year, month, n, &mut counter)?;
        Ok((records, counter.peek()))
    }
}

/// `floor(price * rate)`, computed in exact decimal arithmetic.
#[must_use]
pub fn apply_rate(price: u32, rate: Decimal) -> u32 {
    (Decimal::from(price) * rate)
        .floor()
        .to_u32()
        .unwrap_or(u32::MAX)
}

/// 10% consumption tax added on top of the price
#[must_use]
pub fn tax_inclusive(price: u32) -> u32 {
    apply_rate(price, Decimal::new(11, 1))
}

/// The 10% consumption tax portion of a price
#[must_use]
pub fn tax_portion(price: u32) -> u32 {
    apply_rate(price, Decimal::new(1, 1))
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn serialize_timestamp<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
}
