use std::sync::Arc;

use super::common::*;
use crate::eligibility::{
    EligibilityPolicy, EligibilityService, EligibilityServiceError, StoreError, UserId,
};

#[test]
fn anonymous_caller_must_log_in() {
    let service = build_service(MemoryStore::default());
    let verdict = service
        .check_appointment_eligibility_on(None, today())
        .expect("no store read needed");

    assert_eq!(
        verdict.reasons,
        vec!["Must be logged in to schedule appointments"]
    );
    assert_eq!(verdict.required_documents, None);
}

#[test]
fn first_time_donor_can_book() {
    let service = build_service(MemoryStore::default());
    let verdict = service
        .check_appointment_eligibility_on(Some(&donor()), today())
        .expect("store reachable");

    assert!(verdict.is_eligible);
    assert_eq!(verdict.next_eligible_date, None);
}

#[test]
fn recent_donation_reports_days_remaining() {
    let store = MemoryStore::default()
        .with_donation(&donor(), days_ago(200))
        .with_donation(&donor(), days_ago(10));
    let service = build_service(store);

    let verdict = service
        .check_appointment_eligibility_on(Some(&donor()), today())
        .expect("store reachable");
    assert_eq!(
        verdict.reasons,
        vec!["Must wait 46 more days since last donation"]
    );
    assert_eq!(verdict.next_eligible_date, None);
}

#[test]
fn scheduled_appointment_and_recency_are_both_reported() {
    let store = MemoryStore::default()
        .with_appointment(scheduled_appointment(&donor()))
        .with_donation(&donor(), days_ago(30));
    let service = build_service(store);

    let verdict = service
        .check_appointment_eligibility_on(Some(&donor()), today())
        .expect("store reachable");
    assert_eq!(
        verdict.reasons,
        vec![
            "You already have a scheduled appointment",
            "Must wait 26 more days since last donation",
        ]
    );
}

#[test]
fn other_donors_records_are_ignored() {
    let someone_else = UserId("donor-7".to_string());
    let store = MemoryStore::default()
        .with_appointment(scheduled_appointment(&someone_else))
        .with_donation(&someone_else, days_ago(1));
    let service = build_service(store);

    let verdict = service
        .check_appointment_eligibility_on(Some(&donor()), today())
        .expect("store reachable");
    assert!(verdict.is_eligible);
}

#[test]
fn store_failure_surfaces_as_error() {
    let service = EligibilityService::new(Arc::new(UnavailableStore), EligibilityPolicy::default());
    let error = service
        .check_appointment_eligibility_on(Some(&donor()), today())
        .expect_err("store denies the read");
    assert!(matches!(
        error,
        EligibilityServiceError::Store(StoreError::PermissionDenied(_))
    ));
    assert!(error.to_string().starts_with("unable to check eligibility right now"));
}
