mod appointment;
mod config;
mod donation;
mod request;
mod verdict;

pub use config::EligibilityPolicy;
pub use verdict::{Disqualification, EligibilityVerdict, GatedAction};

use super::domain::{HealthProfile, UrgencyLevel};
use chrono::NaiveDate;

/// Stateless evaluator applying the screening policy to facts gathered by the caller.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEngine {
    policy: EligibilityPolicy,
}

impl EligibilityEngine {
    pub fn new(policy: EligibilityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    pub fn donation(&self, profile: &HealthProfile, today: NaiveDate) -> EligibilityVerdict {
        let assessment = donation::assess_donation(profile, &self.policy, today);
        let mut verdict = EligibilityVerdict::from_disqualifications(&assessment.disqualifications);
        verdict.next_eligible_date = assessment.next_eligible_date;
        verdict
    }

    pub fn request(
        &self,
        urgency: UrgencyLevel,
        pending_requests: usize,
        inventory_records: Option<usize>,
    ) -> EligibilityVerdict {
        let disqualifications =
            request::assess_request(urgency, pending_requests, inventory_records);
        let mut verdict = EligibilityVerdict::from_disqualifications(&disqualifications);
        verdict.required_documents = Some(request::required_documents(urgency));
        verdict
    }

    pub fn appointment(
        &self,
        scheduled_appointments: usize,
        last_donation: Option<NaiveDate>,
        today: NaiveDate,
    ) -> EligibilityVerdict {
        let disqualifications = appointment::assess_appointment(
            scheduled_appointments,
            last_donation,
            &self.policy,
            today,
        );
        EligibilityVerdict::from_disqualifications(&disqualifications)
    }

    /// Verdict for a caller with no identity; nothing else is evaluated.
    pub fn unauthenticated(&self, action: GatedAction) -> EligibilityVerdict {
        let mut verdict =
            EligibilityVerdict::from_disqualifications(&[Disqualification::NotAuthenticated(
                action,
            )]);
        if action == GatedAction::RequestBlood {
            verdict.required_documents = Some(Vec::new());
        }
        verdict
    }
}
