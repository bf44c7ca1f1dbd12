//! System1: purchase records carrying a gross amount and a tax inclusive amount.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;

use crate::catalog::PriceCatalog;
use crate::dates;
use crate::error::GenError;
use crate::record::{serialize_timestamp, tax_inclusive, RecordGenerator, CUSTOMER_IDS};
use crate::sequence::SequenceCounter;
use crate::weighted::WeightedTable;
use crate::SourceSystem;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Purchase,
    Canceled,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    BankTransfer,
    Convenience,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoreCode {
    Tokyo,
    Osaka,
    Online,
}

/// Columns are serialized in declaration order, which is also the CSV header order.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SalesRecord {
    pub sales_mgmt_no: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub order_datetime: NaiveDateTime,
    pub customer_id: u32,
    pub product_id: u32,
    pub amount: u32,
    pub amount_include_tax: u32,
    pub order_status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub store_code: StoreCode,
}

pub const ORDER_STATUS_WEIGHTS: [(OrderStatus, f64); 2] =
    [(OrderStatus::Purchase, 0.9), (OrderStatus::Canceled, 0.1)];

pub const PAYMENT_METHODS: [PaymentMethod; 3] = [
    PaymentMethod::CreditCard,
    PaymentMethod::BankTransfer,
    PaymentMethod::Convenience,
];

pub const STORE_CODES: [StoreCode; 3] = [StoreCode::Tokyo, StoreCode::Osaka, StoreCode::Online];

#[derive(Debug, Clone)]
pub struct SalesGenerator {
    order_status: WeightedTable<OrderStatus>,
    payment_method: WeightedTable<PaymentMethod>,
    store_code: WeightedTable<StoreCode>,
}

impl SalesGenerator {
    /// # Errors
    /// Errors if one of the categorical tables is malformed
    pub fn new() -> Result<Self, GenError> {
        Ok(SalesGenerator {
            order_status: WeightedTable::new(&ORDER_STATUS_WEIGHTS)?,
            payment_method: WeightedTable::uniform(&PAYMENT_METHODS)?,
            store_code: WeightedTable::uniform(&STORE_CODES)?,
        })
    }
}

impl RecordGenerator for SalesGenerator {
    type Record = SalesRecord;

    fn system(&self) -> SourceSystem {
        SourceSystem::SalesSys1
    }

    fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        catalog: &PriceCatalog,
        year: i32,
        month: u32,
        n: usize,
        counter: &mut SequenceCounter,
    ) -> Result<Vec<SalesRecord>, GenError> {
        let timestamps = dates::sample_month(rng, year, month, n)?;
        let block = counter.take(n)?;

        let records = block
            .numbers()
            .zip(timestamps)
            .map(|(sales_mgmt_no, order_datetime)| {
                let product = catalog.choose(rng);
                SalesRecord {
                    sales_mgmt_no,
                    order_datetime,
                    customer_id: rng.gen_range(CUSTOMER_IDS),
                    product_id: product.id,
                    amount: product.unit_price,
                    amount_include_tax: tax_inclusive(product.unit_price),
                    order_status: self.order_status.sample(rng),
                    payment_method: self.payment_method.sample(rng),
                    store_code: self.store_code.sample(rng),
                }
            })
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn setup() -> (SalesGenerator, PriceCatalog, Pcg64Mcg) {
        (
            SalesGenerator::new().unwrap(),
            PriceCatalog::default(),
            Pcg64Mcg::seed_from_u64(2025),
        )
    }

    #[test]
    fn test_february_scenario() {
        let (generator, catalog, mut rng) = setup();
        let (records, next_seq) = generator
            .generate_from(&mut rng, &catalog, 2025, 2, 5, 1)
            .unwrap();
        assert_eq!(next_seq, 6);
        let numbers: Vec<&str> = records.iter().map(|r| r.sales_mgmt_no.as_str()).collect();
        assert_eq!(numbers, vec!["A00001", "A00002", "A00003", "A00004", "A00005"]);

        let start = NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 2, 28)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        for record in &records {
            assert!(record.order_datetime >= start && record.order_datetime <= end);
        }
    }

    #[test]
    fn test_derived_fields() {
        let (generator, catalog, mut rng) = setup();
        let mut counter = SequenceCounter::new('A');
        let records = generator
            .generate(&mut rng, &catalog, 2025, 7, 1_000, &mut counter)
            .unwrap();
        assert_eq!(records.len(), 1_000);
        for record in &records {
            let price = catalog.unit_price(record.product_id).unwrap();
            assert_eq!(record.amount, price);
            assert_eq!(record.amount_include_tax, price * 11 / 10);
            assert!(CUSTOMER_IDS.contains(&record.customer_id));
        }
    }

    #[test]
    fn test_categorical_fields_stay_in_their_sets() {
        let (generator, catalog, mut rng) = setup();
        let mut counter = SequenceCounter::new('A');
        let records = generator
            .generate(&mut rng, &catalog, 2025, 3, 10_000, &mut counter)
            .unwrap();
        let mut canceled = 0;
        for record in &records {
            assert!(ORDER_STATUS_WEIGHTS
                .iter()
                .any(|(status, _)| *status == record.order_status));
            assert!(PAYMENT_METHODS.contains(&record.payment_method));
            assert!(STORE_CODES.contains(&record.store_code));
            if record.order_status == OrderStatus::Canceled {
                canceled += 1;
            }
        }
        assert!((700..=1_300).contains(&canceled), "canceled = {canceled}");
    }

    #[test]
    fn test_invalid_month_leaves_counter_untouched() {
        let (generator, catalog, mut rng) = setup();
        let mut counter = SequenceCounter::new('A');
        let res = generator.generate(&mut rng, &catalog, 2025, 13, 10, &mut counter);
        assert!(matches!(res, Err(GenError::InvalidMonth(13))));
        assert_eq!(counter.peek(), 1);
    }

    #[test]
    fn test_sequence_overflow_is_an_error() {
        let (generator, catalog, mut rng) = setup();
        let res = generator.generate_from(&mut rng, &catalog, 2025, 2, 1, u64::MAX);
        assert!(matches!(res, Err(GenError::SequenceOverflow { .. })));

        let mut counter = SequenceCounter::starting_at('A', u64::MAX - 1).unwrap();
        let res = generator.generate(&mut rng, &catalog, 2025, 2, 5, &mut counter);
        assert!(res.is_err());
        assert_eq!(counter.peek(), u64::MAX - 1);
    }

    #[test]
    fn test_csv_columns() {
        let (generator, catalog, mut rng) = setup();
        let (records, _) = generator
            .generate_from(&mut rng, &catalog, 2025, 1, 1, 42)
            .unwrap();
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&records[0]).unwrap();
        let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut lines = data.lines();
        assert_eq!(
            lines.next().unwrap(),
            "sales_mgmt_no,order_datetime,customer_id,product_id,amount,amount_include_tax,order_status,payment_method,store_code"
        );
        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row[0], "A00042");
        assert!(row[1].starts_with("2025-01-"));
        assert_eq!(row[1].len(), "2025-01-01 00:00:00".len());
        assert!(["purchase", "canceled"].contains(&row[6]));
        assert!(["credit_card", "bank_transfer", "convenience"].contains(&row[7]));
        assert!(["TOKYO", "OSAKA", "ONLINE"].contains(&row[8]));
    }
}
