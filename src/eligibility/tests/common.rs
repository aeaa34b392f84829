use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::Value;

use crate::eligibility::domain::{
    AppointmentRecord, AppointmentStatus, BloodRequestRecord, BloodTypeRecord, DonationRecord,
    HealthProfile, RequestStatus, UserId,
};
use crate::eligibility::repository::{
    AppointmentFilter, BloodBankStore, PendingRequestFilter, StoreError,
};
use crate::eligibility::{EligibilityPolicy, EligibilityService};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    today() - chrono::Duration::days(days)
}

pub(super) fn donor() -> UserId {
    UserId("donor-42".to_string())
}

/// Adult donor who passes every rule.
pub(super) fn healthy_profile() -> HealthProfile {
    HealthProfile {
        age: Some(34),
        weight_kg: Some(72.5),
        last_donation_date: Some(days_ago(120)),
        medical_conditions: vec!["Seasonal allergies".to_string()],
        medications: vec!["Antihistamine".to_string()],
        recent_surgery: false,
        recent_tattoo: false,
        recent_travel: false,
    }
}

pub(super) fn inventory(blood_type: &str, quantity: u32, capacity: u32) -> BloodTypeRecord {
    BloodTypeRecord {
        blood_type: blood_type.to_string(),
        quantity,
        capacity,
        updated_at: Utc
            .with_ymd_and_hms(2025, 6, 14, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn pending_request(blood_type: &str, quantity: u32, user: &str) -> BloodRequestRecord {
    BloodRequestRecord {
        blood_type: blood_type.to_string(),
        quantity,
        status: RequestStatus::Pending,
        user_id: Some(UserId(user.to_string())),
    }
}

pub(super) fn scheduled_appointment(donor_id: &UserId) -> AppointmentRecord {
    AppointmentRecord {
        donor_id: donor_id.clone(),
        appointment_date: today() + chrono::Duration::days(3),
        appointment_time: NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
        status: AppointmentStatus::Scheduled,
    }
}

pub(super) fn build_service(store: MemoryStore) -> EligibilityService<MemoryStore> {
    EligibilityService::new(Arc::new(store), EligibilityPolicy::default())
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    inventory: Arc<Mutex<BTreeMap<String, BloodTypeRecord>>>,
    requests: Arc<Mutex<Vec<BloodRequestRecord>>>,
    appointments: Arc<Mutex<Vec<AppointmentRecord>>>,
    donations: Arc<Mutex<Vec<DonationRecord>>>,
}

impl MemoryStore {
    pub(super) fn with_inventory(self, records: impl IntoIterator<Item = BloodTypeRecord>) -> Self {
        {
            let mut guard = self.inventory.lock().expect("inventory mutex poisoned");
            for record in records {
                guard.insert(record.blood_type.clone(), record);
            }
        }
        self
    }

    pub(super) fn with_requests(
        self,
        requests: impl IntoIterator<Item = BloodRequestRecord>,
    ) -> Self {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .extend(requests);
        self
    }

    pub(super) fn with_appointment(self, appointment: AppointmentRecord) -> Self {
        self.appointments
            .lock()
            .expect("appointment mutex poisoned")
            .push(appointment);
        self
    }

    pub(super) fn with_donation(self, donor_id: &UserId, donation_date: NaiveDate) -> Self {
        self.donations
            .lock()
            .expect("donation mutex poisoned")
            .push(DonationRecord {
                donor_id: donor_id.clone(),
                donation_date,
            });
        self
    }

    pub(super) fn set_inventory(&self, record: BloodTypeRecord) {
        self.inventory
            .lock()
            .expect("inventory mutex poisoned")
            .insert(record.blood_type.clone(), record);
    }
}

impl BloodBankStore for MemoryStore {
    fn blood_type_record(&self, blood_type: &str) -> Result<Option<BloodTypeRecord>, StoreError> {
        let guard = self.inventory.lock().expect("inventory mutex poisoned");
        Ok(guard.get(blood_type).cloned())
    }

    fn pending_requests(
        &self,
        filter: &PendingRequestFilter,
    ) -> Result<Vec<BloodRequestRecord>, StoreError> {
        let guard = self.requests.lock().expect("request mutex poisoned");
        Ok(guard
            .iter()
            .filter(|request| request.status == RequestStatus::Pending && filter.matches(request))
            .cloned()
            .collect())
    }

    fn appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentRecord>, StoreError> {
        let guard = self.appointments.lock().expect("appointment mutex poisoned");
        Ok(guard
            .iter()
            .filter(|appointment| {
                appointment.donor_id == filter.donor_id && appointment.status == filter.status
            })
            .cloned()
            .collect())
    }

    fn most_recent_donation(
        &self,
        donor_id: &UserId,
    ) -> Result<Option<DonationRecord>, StoreError> {
        let guard = self.donations.lock().expect("donation mutex poisoned");
        Ok(guard
            .iter()
            .filter(|donation| &donation.donor_id == donor_id)
            .max_by_key(|donation| donation.donation_date)
            .cloned())
    }

    fn blood_type_records(&self) -> Result<Vec<BloodTypeRecord>, StoreError> {
        let guard = self.inventory.lock().expect("inventory mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Every read fails: appointment reads are denied, everything else is unreachable.
pub(super) struct UnavailableStore;

impl BloodBankStore for UnavailableStore {
    fn blood_type_record(&self, _blood_type: &str) -> Result<Option<BloodTypeRecord>, StoreError> {
        Err(unavailable())
    }

    fn pending_requests(
        &self,
        _filter: &PendingRequestFilter,
    ) -> Result<Vec<BloodRequestRecord>, StoreError> {
        Err(unavailable())
    }

    fn appointments(
        &self,
        _filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentRecord>, StoreError> {
        Err(StoreError::PermissionDenied(
            "appointments restricted to the donor".to_string(),
        ))
    }

    fn most_recent_donation(
        &self,
        _donor_id: &UserId,
    ) -> Result<Option<DonationRecord>, StoreError> {
        Err(unavailable())
    }

    fn blood_type_records(&self) -> Result<Vec<BloodTypeRecord>, StoreError> {
        Err(unavailable())
    }
}

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection reset".to_string())
}

pub(super) async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
