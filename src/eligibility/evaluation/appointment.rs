use chrono::NaiveDate;

use super::config::EligibilityPolicy;
use super::donation::days_until_next_donation;
use super::verdict::Disqualification;

pub(crate) fn assess_appointment(
    scheduled_appointments: usize,
    last_donation: Option<NaiveDate>,
    policy: &EligibilityPolicy,
    today: NaiveDate,
) -> Vec<Disqualification> {
    let mut disqualifications = Vec::new();

    if scheduled_appointments > 0 {
        disqualifications.push(Disqualification::ScheduledAppointmentExists);
    }

    if let Some(days_remaining) = last_donation.and_then(|last| {
        days_until_next_donation(last, today, policy.donation_interval_days)
    }) {
        disqualifications.push(Disqualification::DonationIntervalNotElapsed { days_remaining });
    }

    disqualifications
}
