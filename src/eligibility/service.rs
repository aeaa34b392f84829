use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use super::availability::{
    enrich_inventory, score_availability, BloodAvailability, InventoryWithDemand,
    PendingRequestAggregate,
};
use super::compatibility::compatible_donors;
use super::domain::{AppointmentStatus, HealthProfile, UrgencyLevel, UserId};
use super::evaluation::{EligibilityEngine, EligibilityPolicy, EligibilityVerdict, GatedAction};
use super::repository::{AppointmentFilter, BloodBankStore, PendingRequestFilter, StoreError};

/// Facade composing the data store with the eligibility and availability rules.
pub struct EligibilityService<S> {
    store: Arc<S>,
    engine: Arc<EligibilityEngine>,
}

impl<S> EligibilityService<S>
where
    S: BloodBankStore + 'static,
{
    pub fn new(store: Arc<S>, policy: EligibilityPolicy) -> Self {
        Self {
            store,
            engine: Arc::new(EligibilityEngine::new(policy)),
        }
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        self.engine.policy()
    }

    pub fn check_donation_eligibility(&self, profile: &HealthProfile) -> EligibilityVerdict {
        self.check_donation_eligibility_on(profile, today())
    }

    pub fn check_donation_eligibility_on(
        &self,
        profile: &HealthProfile,
        today: NaiveDate,
    ) -> EligibilityVerdict {
        let verdict = self.engine.donation(profile, today);
        debug!(
            eligible = verdict.is_eligible,
            reasons = verdict.reasons.len(),
            "donation eligibility evaluated"
        );
        verdict
    }

    pub fn check_request_eligibility(
        &self,
        caller: Option<&UserId>,
        urgency: UrgencyLevel,
    ) -> Result<EligibilityVerdict, EligibilityServiceError> {
        let Some(caller) = caller else {
            return Ok(self.engine.unauthenticated(GatedAction::RequestBlood));
        };

        let pending = self
            .store
            .pending_requests(&PendingRequestFilter::for_user(caller))
            .map_err(log_store_failure)?;

        let inventory_records = if urgency.requires_inventory() {
            Some(
                self.store
                    .blood_type_records()
                    .map_err(log_store_failure)?
                    .len(),
            )
        } else {
            None
        };

        let verdict = self
            .engine
            .request(urgency, pending.len(), inventory_records);
        debug!(
            caller = %caller,
            urgency = urgency.label(),
            eligible = verdict.is_eligible,
            "request eligibility evaluated"
        );
        Ok(verdict)
    }

    pub fn check_appointment_eligibility(
        &self,
        caller: Option<&UserId>,
    ) -> Result<EligibilityVerdict, EligibilityServiceError> {
        self.check_appointment_eligibility_on(caller, today())
    }

    pub fn check_appointment_eligibility_on(
        &self,
        caller: Option<&UserId>,
        today: NaiveDate,
    ) -> Result<EligibilityVerdict, EligibilityServiceError> {
        let Some(caller) = caller else {
            return Ok(self.engine.unauthenticated(GatedAction::ScheduleAppointment));
        };

        let scheduled = self
            .store
            .appointments(&AppointmentFilter {
                donor_id: caller.clone(),
                status: AppointmentStatus::Scheduled,
            })
            .map_err(log_store_failure)?;
        let last_donation = self
            .store
            .most_recent_donation(caller)
            .map_err(log_store_failure)?;

        let verdict = self.engine.appointment(
            scheduled.len(),
            last_donation.map(|donation| donation.donation_date),
            today,
        );
        debug!(
            caller = %caller,
            eligible = verdict.is_eligible,
            "appointment eligibility evaluated"
        );
        Ok(verdict)
    }

    /// Unknown blood types are looked up as-is and report zero stock.
    pub fn check_availability(
        &self,
        blood_type: &str,
        required_units: u32,
    ) -> Result<BloodAvailability, EligibilityServiceError> {
        let record = self
            .store
            .blood_type_record(blood_type)
            .map_err(log_store_failure)?;
        let pending = self
            .store
            .pending_requests(&PendingRequestFilter::for_blood_type(blood_type))
            .map_err(log_store_failure)?;

        Ok(score_availability(
            blood_type,
            record.as_ref(),
            PendingRequestAggregate::for_type(&pending, blood_type),
            required_units,
        ))
    }

    pub fn check_compatible_blood_types(
        &self,
        recipient: &str,
    ) -> Result<Vec<BloodAvailability>, EligibilityServiceError> {
        compatible_donors(recipient)
            .iter()
            .map(|donor| self.check_availability(donor.label(), 1))
            .collect()
    }

    pub fn blood_inventory_with_requests(
        &self,
    ) -> Result<Vec<InventoryWithDemand>, EligibilityServiceError> {
        let records = self
            .store
            .blood_type_records()
            .map_err(log_store_failure)?;
        let pending = self
            .store
            .pending_requests(&PendingRequestFilter::default())
            .map_err(log_store_failure)?;
        Ok(enrich_inventory(records, &pending))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn log_store_failure(error: StoreError) -> StoreError {
    warn!(%error, "eligibility store read failed");
    error
}

/// Error raised when eligibility could not be determined. Never a negative verdict.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityServiceError {
    #[error("unable to check eligibility right now: {0}")]
    Store(#[from] StoreError),
}
