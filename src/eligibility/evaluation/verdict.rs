use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured eligibility answer returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    pub is_eligible: bool,
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_eligible_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_documents: Option<Vec<String>>,
}

impl EligibilityVerdict {
    pub(crate) fn from_disqualifications(disqualifications: &[Disqualification]) -> Self {
        Self {
            is_eligible: disqualifications.is_empty(),
            reasons: disqualifications
                .iter()
                .map(Disqualification::summary)
                .collect(),
            next_eligible_date: None,
            required_documents: None,
        }
    }

    pub fn summary(&self) -> String {
        if self.is_eligible {
            "eligible".to_string()
        } else if self.reasons.is_empty() {
            "not eligible".to_string()
        } else {
            format!("not eligible: {}", self.reasons.join("; "))
        }
    }
}

/// Action a caller must be authenticated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatedAction {
    RequestBlood,
    ScheduleAppointment,
}

/// Every reason an evaluator can refuse a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Disqualification {
    NotAuthenticated(GatedAction),
    BelowMinimumAge { minimum: u32 },
    AboveMaximumAge { maximum: u32 },
    BelowMinimumWeight { minimum_kg: f64 },
    DonationIntervalNotElapsed { days_remaining: i64 },
    RecentSurgery,
    RecentTattoo,
    RecentTravel,
    ExcludedCondition(String),
    ExcludedMedication(String),
    PendingRequestExists,
    ScheduledAppointmentExists,
    NoInventoryForUrgentRequest,
}

impl Disqualification {
    pub fn summary(&self) -> String {
        match self {
            Disqualification::NotAuthenticated(GatedAction::RequestBlood) => {
                "Must be logged in to request blood".to_string()
            }
            Disqualification::NotAuthenticated(GatedAction::ScheduleAppointment) => {
                "Must be logged in to schedule appointments".to_string()
            }
            Disqualification::BelowMinimumAge { minimum } => {
                format!("Must be at least {minimum} years old to donate")
            }
            Disqualification::AboveMaximumAge { maximum } => {
                format!("Must be under {maximum} years old to donate")
            }
            Disqualification::BelowMinimumWeight { minimum_kg } => {
                format!("Must weigh at least {minimum_kg}kg to donate")
            }
            Disqualification::DonationIntervalNotElapsed { days_remaining } => {
                format!("Must wait {days_remaining} more days since last donation")
            }
            Disqualification::RecentSurgery => {
                "Cannot donate within 4 weeks of surgery".to_string()
            }
            Disqualification::RecentTattoo => {
                "Cannot donate within 4 months of getting a tattoo or piercing".to_string()
            }
            Disqualification::RecentTravel => {
                "Cannot donate within 3 months of travel to certain countries".to_string()
            }
            Disqualification::ExcludedCondition(condition) => {
                format!("Cannot donate due to medical condition: {condition}")
            }
            Disqualification::ExcludedMedication(medication) => {
                format!("Cannot donate while taking: {medication}")
            }
            Disqualification::PendingRequestExists => {
                "You already have a pending blood request".to_string()
            }
            Disqualification::ScheduledAppointmentExists => {
                "You already have a scheduled appointment".to_string()
            }
            Disqualification::NoInventoryForUrgentRequest => {
                "No blood inventory available for urgent requests".to_string()
            }
        }
    }
}
