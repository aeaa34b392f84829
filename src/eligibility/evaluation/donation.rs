use chrono::{Duration, NaiveDate};

use super::super::domain::HealthProfile;
use super::config::EligibilityPolicy;
use super::verdict::Disqualification;

pub(crate) struct DonationAssessment {
    pub disqualifications: Vec<Disqualification>,
    pub next_eligible_date: Option<NaiveDate>,
}

/// Runs every donation rule; none of them stops the others.
pub(crate) fn assess_donation(
    profile: &HealthProfile,
    policy: &EligibilityPolicy,
    today: NaiveDate,
) -> DonationAssessment {
    let mut disqualifications = Vec::new();
    let mut next_eligible_date = None;

    if let Some(age) = profile.age {
        if age < policy.minimum_age {
            disqualifications.push(Disqualification::BelowMinimumAge {
                minimum: policy.minimum_age,
            });
        } else if age > policy.maximum_age {
            disqualifications.push(Disqualification::AboveMaximumAge {
                maximum: policy.maximum_age,
            });
        }
    }

    if let Some(weight) = profile.weight_kg {
        if weight < policy.minimum_weight_kg {
            disqualifications.push(Disqualification::BelowMinimumWeight {
                minimum_kg: policy.minimum_weight_kg,
            });
        }
    }

    if let Some(last_donation) = profile.last_donation_date {
        if let Some(days_remaining) =
            days_until_next_donation(last_donation, today, policy.donation_interval_days)
        {
            disqualifications.push(Disqualification::DonationIntervalNotElapsed { days_remaining });
            next_eligible_date = today.checked_add_signed(Duration::days(days_remaining));
        }
    }

    if profile.recent_surgery {
        disqualifications.push(Disqualification::RecentSurgery);
    }
    if profile.recent_tattoo {
        disqualifications.push(Disqualification::RecentTattoo);
    }
    if profile.recent_travel {
        disqualifications.push(Disqualification::RecentTravel);
    }

    for condition in &profile.medical_conditions {
        if mentions_any(condition, &policy.excluded_conditions) {
            disqualifications.push(Disqualification::ExcludedCondition(condition.clone()));
        }
    }

    for medication in &profile.medications {
        if mentions_any(medication, &policy.excluded_medications) {
            disqualifications.push(Disqualification::ExcludedMedication(medication.clone()));
        }
    }

    DonationAssessment {
        disqualifications,
        next_eligible_date,
    }
}

/// Whole days left before another donation is allowed, or `None` once the interval has passed.
pub(crate) fn days_until_next_donation(
    last_donation: NaiveDate,
    today: NaiveDate,
    interval_days: i64,
) -> Option<i64> {
    let elapsed = today.signed_duration_since(last_donation).num_days();
    (elapsed < interval_days).then(|| interval_days - elapsed)
}

/// Case-insensitive substring match, so "No Hepatitis B history" also matches.
fn mentions_any(value: &str, exclusions: &[String]) -> bool {
    let value = value.to_lowercase();
    exclusions
        .iter()
        .any(|exclusion| value.contains(&exclusion.to_lowercase()))
}
