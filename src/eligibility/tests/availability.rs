use std::sync::Arc;

use super::common::*;
use crate::eligibility::{
    BloodType, EligibilityPolicy, EligibilityService, PendingRequestAggregate, RequestStatus,
    StockLevel,
};

#[test]
fn insufficient_stock_is_unavailable() {
    let store = MemoryStore::default()
        .with_inventory([inventory("O+", 3, 100)])
        .with_requests([
            pending_request("O+", 2, "ward-1"),
            pending_request("O+", 4, "ward-2"),
            pending_request("A+", 9, "ward-3"),
        ]);
    let service = build_service(store);

    let availability = service.check_availability("O+", 5).expect("store reachable");
    assert_eq!(availability.blood_type, "O+");
    assert_eq!(availability.available_units, 3);
    assert_eq!(availability.capacity, 100);
    assert_eq!(availability.pending_requests, 6);
    assert!(!availability.is_available);
    assert_eq!(availability.stock_level, StockLevel::Critical);
}

#[test]
fn exact_stock_is_available() {
    let store = MemoryStore::default().with_inventory([inventory("B-", 12, 40)]);
    let service = build_service(store);

    let availability = service.check_availability("B-", 12).expect("store reachable");
    assert!(availability.is_available);
    assert_eq!(availability.stock_level, StockLevel::Low);
}

#[test]
fn unknown_type_reports_zero_stock_at_default_capacity() {
    let service = build_service(MemoryStore::default());

    let availability = service
        .check_availability("Bombay", 1)
        .expect("store reachable");
    assert_eq!(availability.blood_type, "Bombay");
    assert_eq!(availability.available_units, 0);
    assert_eq!(availability.capacity, 100);
    assert_eq!(availability.pending_requests, 0);
    assert!(!availability.is_available);
    assert_eq!(availability.stock_level, StockLevel::Critical);
}

#[test]
fn zero_units_required_is_always_available() {
    let service = build_service(MemoryStore::default());
    let availability = service.check_availability("A-", 0).expect("store reachable");
    assert!(availability.is_available);
}

#[test]
fn universal_recipient_checks_every_type_in_order() {
    let store = MemoryStore::default().with_inventory([
        inventory("O-", 50, 100),
        inventory("AB+", 10, 100),
    ]);
    let service = build_service(store);

    let results = service
        .check_compatible_blood_types("AB+")
        .expect("store reachable");
    let labels: Vec<&str> = results
        .iter()
        .map(|availability| availability.blood_type.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["O-", "O+", "A-", "A+", "B-", "B+", "AB-", "AB+"]
    );
    assert!(results[0].is_available);
    assert_eq!(results[0].stock_level, StockLevel::Good);
    assert!(!results[1].is_available);
    assert!(results[7].is_available);
}

#[test]
fn universal_donor_recipient_only_accepts_o_negative() {
    let service = build_service(MemoryStore::default());
    let results = service
        .check_compatible_blood_types("O-")
        .expect("store reachable");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].blood_type, "O-");
}

#[test]
fn unknown_recipient_has_no_compatible_types() {
    let service = EligibilityService::new(Arc::new(UnavailableStore), EligibilityPolicy::default());
    let results = service
        .check_compatible_blood_types("Z+")
        .expect("nothing to read");
    assert!(results.is_empty());
}

#[test]
fn compatible_check_propagates_store_failures() {
    let service = EligibilityService::new(Arc::new(UnavailableStore), EligibilityPolicy::default());
    assert!(service.check_compatible_blood_types("A-").is_err());
}

#[test]
fn compatibility_table_is_symmetric_with_recipients() {
    for recipient in BloodType::ALL {
        for donor in recipient.compatible_donors() {
            assert!(donor.compatible_recipients().contains(&recipient));
        }
    }
    assert_eq!(BloodType::ONegative.compatible_recipients().len(), 8);
    assert_eq!(
        BloodType::ABPositive.compatible_recipients(),
        vec![BloodType::ABPositive]
    );
}

#[test]
fn inventory_view_is_enriched_with_pending_demand() {
    let mut fulfilled = pending_request("A+", 7, "ward-9");
    fulfilled.status = RequestStatus::Fulfilled;
    let store = MemoryStore::default()
        .with_inventory([inventory("A+", 30, 100), inventory("O-", 10, 50)])
        .with_requests([
            pending_request("A+", 2, "ward-1"),
            pending_request("A+", 3, "ward-2"),
            fulfilled,
            pending_request("AB-", 1, "ward-3"),
        ]);
    let service = build_service(store);

    let rows = service
        .blood_inventory_with_requests()
        .expect("store reachable");
    assert_eq!(rows.len(), 2);

    let a_pos = &rows[0];
    assert_eq!(a_pos.blood_type, "A+");
    assert_eq!(a_pos.pending_requests, 5);
    assert_eq!(a_pos.request_count, 2);
    assert_eq!(a_pos.stock_percentage, 30.0);
    assert_eq!(a_pos.stock_level(), StockLevel::Low);

    let o_neg = &rows[1];
    assert_eq!(o_neg.blood_type, "O-");
    assert_eq!(o_neg.pending_requests, 0);
    assert_eq!(o_neg.request_count, 0);
    assert_eq!(o_neg.stock_percentage, 20.0);
}

#[test]
fn pending_aggregates_skip_non_pending_rows() {
    let mut approved = pending_request("O+", 10, "ward-1");
    approved.status = RequestStatus::Approved;
    let requests = vec![
        approved,
        pending_request("O+", 1, "ward-2"),
        pending_request("O+", 2, "ward-3"),
    ];

    let aggregate = PendingRequestAggregate::for_type(&requests, "O+");
    assert_eq!(aggregate, PendingRequestAggregate { units: 3, count: 2 });

    let by_type = PendingRequestAggregate::by_type(&requests);
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type["O+"].units, 3);
}

#[test]
fn zero_capacity_record_is_scored_against_default_capacity() {
    let store = MemoryStore::default().with_inventory([inventory("A-", 50, 0)]);
    let service = build_service(store);

    let availability = service.check_availability("A-", 10).expect("store reachable");
    assert_eq!(availability.capacity, 100);
    assert_eq!(availability.stock_level, StockLevel::Good);
    assert!(availability.is_available);
}

#[test]
fn compatibility_lookup_requires_exact_labels() {
    let service = build_service(MemoryStore::default());
    for label in ["ab+", " AB+", "AB\u{2212}"] {
        let results = service
            .check_compatible_blood_types(label)
            .expect("store reachable");
        assert!(results.is_empty(), "{label:?}");
    }
}
