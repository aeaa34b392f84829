use std::cmp::Ordering;

use serde::Serialize;

use super::availability::{InventoryWithDemand, StockLevel};

/// More pending requests than this marks a type as high demand.
const HIGH_DEMAND_REQUEST_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionFlag {
    CriticalStock,
    HighDemand,
}

impl AttentionFlag {
    pub const fn label(self) -> &'static str {
        match self {
            AttentionFlag::CriticalStock => "Critical stock",
            AttentionFlag::HighDemand => "High demand",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryReportRow {
    pub blood_type: String,
    pub quantity: u32,
    pub capacity: u32,
    pub stock_percentage: f64,
    pub stock_level: StockLevel,
    pub pending_requests: u32,
    pub request_count: usize,
    pub flags: Vec<AttentionFlag>,
}

impl InventoryReportRow {
    pub fn needs_attention(&self) -> bool {
        !self.flags.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventoryTotals {
    pub units_on_hand: u64,
    pub capacity: u64,
    pub pending_units: u64,
    pub critical_types: usize,
}

/// Triage-ordered dashboard over the bulk inventory view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryReport {
    pub rows: Vec<InventoryReportRow>,
    pub totals: InventoryTotals,
}

impl InventoryReport {
    pub fn from_inventory(inventory: &[InventoryWithDemand]) -> Self {
        let mut rows: Vec<InventoryReportRow> = inventory.iter().map(report_row).collect();
        rows.sort_by(triage_order);

        let totals = rows.iter().fold(InventoryTotals::default(), |mut acc, row| {
            acc.units_on_hand += u64::from(row.quantity);
            acc.capacity += u64::from(row.capacity);
            acc.pending_units += u64::from(row.pending_requests);
            if row.stock_level == StockLevel::Critical {
                acc.critical_types += 1;
            }
            acc
        });

        Self { rows, totals }
    }

    pub fn needs_attention(&self) -> impl Iterator<Item = &InventoryReportRow> {
        self.rows.iter().filter(|row| row.needs_attention())
    }
}

fn report_row(item: &InventoryWithDemand) -> InventoryReportRow {
    let stock_level = item.stock_level();
    let mut flags = Vec::new();
    if stock_level == StockLevel::Critical {
        flags.push(AttentionFlag::CriticalStock);
    }
    if item.request_count > HIGH_DEMAND_REQUEST_COUNT {
        flags.push(AttentionFlag::HighDemand);
    }

    InventoryReportRow {
        blood_type: item.blood_type.clone(),
        quantity: item.quantity,
        capacity: item.capacity,
        stock_percentage: item.stock_percentage,
        stock_level,
        pending_requests: item.pending_requests,
        request_count: item.request_count,
        flags,
    }
}

/// Flagged rows first, then emptiest stock, then label.
fn triage_order(left: &InventoryReportRow, right: &InventoryReportRow) -> Ordering {
    right
        .needs_attention()
        .cmp(&left.needs_attention())
        .then_with(|| left.stock_percentage.total_cmp(&right.stock_percentage))
        .then_with(|| left.blood_type.cmp(&right.blood_type))
}
