//! System2: billing records carrying a net price and the tax due on it.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;

use crate::catalog::PriceCatalog;
use crate::dates;
use crate::error::GenError;
use crate::record::{serialize_timestamp, tax_portion, RecordGenerator, CUSTOMER_IDS};
use crate::sequence::SequenceCounter;
use crate::weighted::WeightedTable;
use crate::SourceSystem;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BillingStatus {
    Billed,
    Canceled,
    Adjusted,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionPlan {
    #[serde(rename = "PLAN_A")]
    PlanA,
    #[serde(rename = "PLAN_B")]
    PlanB,
    #[serde(rename = "PLAN_C")]
    PlanC,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    OneTime,
    Monthly,
    Yearly,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BillingRecord {
    pub sales_mgmt_no: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub billing_datetime: NaiveDateTime,
    pub customer_id: u32,
    pub product_id: u32,
    pub price: u32,
    pub tax_price: u32,
    pub billing_status: BillingStatus,
    #[serde(rename = "subscription_plan_id")]
    pub subscription_plan: SubscriptionPlan,
    pub billing_cycle: BillingCycle,
}

pub const BILLING_STATUS_WEIGHTS: [(BillingStatus, f64); 3] = [
    (BillingStatus::Billed, 0.85),
    (BillingStatus::Canceled, 0.1),
    (BillingStatus::Adjusted, 0.05),
];

pub const SUBSCRIPTION_PLANS: [SubscriptionPlan; 3] = [
    SubscriptionPlan::PlanA,
    SubscriptionPlan::PlanB,
    SubscriptionPlan::PlanC,
];

pub const BILLING_CYCLES: [BillingCycle; 3] = [
    BillingCycle::OneTime,
    BillingCycle::Monthly,
    BillingCycle::Yearly,
];

#[derive(Debug, Clone)]
pub struct BillingGenerator {
    billing_status: WeightedTable<BillingStatus>,
    subscription_plan: WeightedTable<SubscriptionPlan>,
    billing_cycle: WeightedTable<BillingCycle>,
}

impl BillingGenerator {
    /// # Errors
    /// Errors if one of the categorical tables is malformed
    pub fn new() -> Result<Self, GenError> {
        Ok(BillingGenerator {
            billing_status: WeightedTable::new(&BILLING_STATUS_WEIGHTS)?,
            subscription_plan: WeightedTable::uniform(&SUBSCRIPTION_PLANS)?,
            billing_cycle: WeightedTable::uniform(&BILLING_CYCLES)?,
        })
    }
}

impl RecordGenerator for BillingGenerator {
    type Record = BillingRecord;

    fn system(&self) -> SourceSystem {
        SourceSystem::SalesSys2
    }

    fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        catalog: &PriceCatalog,
        year: i32,
        month: u32,
        n: usize,
        counter: &mut SequenceCounter,
    ) -> Result<Vec<BillingRecord>, GenError> {
        let timestamps = dates::sample_month(rng, year, month, n)?;
        let block = counter.take(n)?;

        let records = block
            .numbers()
            .zip(timestamps)
            .map(|(sales_mgmt_no, billing_datetime)| {
                let product = catalog.choose(rng);
                BillingRecord {
                    sales_mgmt_no,
                    billing_datetime,
                    customer_id: rng.gen_range(CUSTOMER_IDS),
                    product_id: product.id,
                    price: product.unit_price,
                    tax_price: tax_portion(product.unit_price),
                    billing_status: self.billing_status.sample(rng),
                    subscription_plan: self.subscription_plan.sample(rng),
                    billing_cycle: self.billing_cycle.sample(rng),
                }
            })
            .collect();
        Ok(records)
    }
}
