use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{BloodRequestRecord, BloodTypeRecord, RequestStatus};

/// Capacity assumed for blood types with no inventory row or a zero stored capacity.
pub const DEFAULT_CAPACITY: u32 = 100;

const CRITICAL_BELOW_PERCENT: u64 = 20;
const LOW_BELOW_PERCENT: u64 = 40;

/// Three-tier classification of stock relative to storage capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Critical,
    Low,
    Good,
}

impl StockLevel {
    /// Integer comparison keeps the 20% and 40% boundaries exact. Bulk rows keep their stored
    /// capacity, so a zero there counts as empty.
    pub fn classify(quantity: u32, capacity: u32) -> Self {
        if capacity == 0 {
            return StockLevel::Critical;
        }
        let scaled = u64::from(quantity) * 100;
        let capacity = u64::from(capacity);
        if scaled < capacity * CRITICAL_BELOW_PERCENT {
            StockLevel::Critical
        } else if scaled < capacity * LOW_BELOW_PERCENT {
            StockLevel::Low
        } else {
            StockLevel::Good
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StockLevel::Critical => "critical",
            StockLevel::Low => "low",
            StockLevel::Good => "good",
        }
    }
}

pub fn stock_percentage(quantity: u32, capacity: u32) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    f64::from(quantity) * 100.0 / f64::from(capacity)
}

/// Availability of one blood type for a requested number of units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodAvailability {
    pub blood_type: String,
    pub available_units: u32,
    pub capacity: u32,
    pub pending_requests: u32,
    pub is_available: bool,
    pub stock_level: StockLevel,
}

/// Pending demand for one blood type: summed units and number of request rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequestAggregate {
    pub units: u32,
    pub count: usize,
}

impl PendingRequestAggregate {
    fn add(&mut self, request: &BloodRequestRecord) {
        self.units = self.units.saturating_add(request.quantity);
        self.count += 1;
    }

    /// Aggregates the pending rows for `blood_type`, ignoring everything else.
    pub fn for_type(requests: &[BloodRequestRecord], blood_type: &str) -> Self {
        let mut aggregate = Self::default();
        for request in requests
            .iter()
            .filter(|request| request.status == RequestStatus::Pending)
            .filter(|request| request.blood_type == blood_type)
        {
            aggregate.add(request);
        }
        aggregate
    }

    pub fn by_type(requests: &[BloodRequestRecord]) -> BTreeMap<String, Self> {
        let mut aggregates: BTreeMap<String, Self> = BTreeMap::new();
        for request in requests
            .iter()
            .filter(|request| request.status == RequestStatus::Pending)
        {
            aggregates
                .entry(request.blood_type.clone())
                .or_default()
                .add(request);
        }
        aggregates
    }
}

/// Inventory row enriched with pending demand, as rendered on dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryWithDemand {
    pub blood_type: String,
    pub quantity: u32,
    pub capacity: u32,
    pub updated_at: DateTime<Utc>,
    pub stock_percentage: f64,
    pub pending_requests: u32,
    pub request_count: usize,
}

impl InventoryWithDemand {
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.quantity, self.capacity)
    }
}

pub(crate) fn score_availability(
    blood_type: &str,
    record: Option<&BloodTypeRecord>,
    pending: PendingRequestAggregate,
    required_units: u32,
) -> BloodAvailability {
    let available_units = record.map(|record| record.quantity).unwrap_or(0);
    let capacity = record
        .map(|record| record.capacity)
        .filter(|capacity| *capacity > 0)
        .unwrap_or(DEFAULT_CAPACITY);

    BloodAvailability {
        blood_type: blood_type.to_string(),
        available_units,
        capacity,
        pending_requests: pending.units,
        is_available: available_units >= required_units,
        stock_level: StockLevel::classify(available_units, capacity),
    }
}

pub(crate) fn enrich_inventory(
    records: Vec<BloodTypeRecord>,
    requests: &[BloodRequestRecord],
) -> Vec<InventoryWithDemand> {
    let demand = PendingRequestAggregate::by_type(requests);
    records
        .into_iter()
        .map(|record| {
            let pending = demand.get(&record.blood_type).copied().unwrap_or_default();
            InventoryWithDemand {
                stock_percentage: stock_percentage(record.quantity, record.capacity),
                pending_requests: pending.units,
                request_count: pending.count,
                blood_type: record.blood_type,
                quantity: record.quantity,
                capacity: record.capacity,
                updated_at: record.updated_at,
            }
        })
        .collect()
}
