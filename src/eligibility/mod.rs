//! Donation, request, and appointment eligibility plus inventory-aware availability scoring.
//!
//! Evaluators are pure and operate on facts the [`EligibilityService`] reads from a
//! [`BloodBankStore`]. A store failure is always surfaced as an error, never as a verdict.

pub mod availability;
pub mod compatibility;
pub mod domain;
pub(crate) mod evaluation;
pub mod feed;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use availability::{
    BloodAvailability, InventoryWithDemand, PendingRequestAggregate, StockLevel,
};
pub use compatibility::compatible_donors;
pub use domain::{
    AppointmentRecord, AppointmentStatus, BloodRequestRecord, BloodType, BloodTypeRecord,
    DonationRecord, HealthProfile, ParseBloodTypeError, RequestStatus, UrgencyLevel, UserId,
};
pub use evaluation::{
    Disqualification, EligibilityEngine, EligibilityPolicy, EligibilityVerdict, GatedAction,
};
pub use feed::{
    InventoryChange, InventoryChangeKind, InventoryFeed, InventorySnapshot, InventoryWatcher,
};
pub use report::{AttentionFlag, InventoryReport, InventoryReportRow, InventoryTotals};
pub use repository::{AppointmentFilter, BloodBankStore, PendingRequestFilter, StoreError};
pub use router::eligibility_router;
pub use service::{EligibilityService, EligibilityServiceError};
