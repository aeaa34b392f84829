use chrono::{NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::StoreConfig;
use crate::eligibility::{
    AppointmentFilter, AppointmentRecord, BloodBankStore, BloodRequestRecord, BloodTypeRecord,
    DonationRecord, InventoryChange, InventoryChangeKind, InventoryFeed, PendingRequestFilter,
    RequestStatus, StoreError, UserId,
};
use crate::error::AppError;
use crate::snapshot;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreTables {
    inventory: BTreeMap<String, BloodTypeRecord>,
    requests: Vec<BloodRequestRecord>,
    appointments: Vec<AppointmentRecord>,
    donations: Vec<DonationRecord>,
}

/// Process-local stand-in for the hosted database. Inventory writes fire the change feed.
#[derive(Default, Clone)]
pub(crate) struct InMemoryBloodBankStore {
    tables: Arc<Mutex<StoreTables>>,
    feed: Option<InventoryFeed>,
}

impl InMemoryBloodBankStore {
    pub(crate) fn with_feed(feed: InventoryFeed) -> Self {
        Self {
            tables: Arc::default(),
            feed: Some(feed),
        }
    }

    /// Seeds from the configured CSV snapshots; missing paths leave the tables empty.
    pub(crate) fn seed_from_config(&self, config: &StoreConfig) -> Result<(), AppError> {
        self.seed_from_paths(config.inventory_csv.as_deref(), config.requests_csv.as_deref())
    }

    pub(crate) fn seed_from_paths(
        &self,
        inventory: Option<&Path>,
        requests: Option<&Path>,
    ) -> Result<(), AppError> {
        let inventory = inventory.map(snapshot::load_inventory).transpose()?;
        let requests = requests.map(snapshot::load_requests).transpose()?;

        let mut tables = self.lock()?;
        for record in inventory.into_iter().flatten() {
            tables.inventory.insert(record.blood_type.clone(), record);
        }
        tables.requests.extend(requests.into_iter().flatten());
        Ok(())
    }

    pub(crate) fn upsert_inventory(
        &self,
        blood_type: &str,
        quantity: u32,
        capacity: u32,
    ) -> Result<BloodTypeRecord, StoreError> {
        let record = BloodTypeRecord {
            blood_type: blood_type.to_string(),
            quantity,
            capacity,
            updated_at: Utc::now(),
        };
        let previous = self
            .lock()?
            .inventory
            .insert(record.blood_type.clone(), record.clone());

        let kind = if previous.is_some() {
            InventoryChangeKind::Update
        } else {
            InventoryChangeKind::Insert
        };
        self.notify(kind, blood_type);
        Ok(record)
    }

    pub(crate) fn remove_inventory(&self, blood_type: &str) -> Result<bool, StoreError> {
        let removed = self.lock()?.inventory.remove(blood_type).is_some();
        if removed {
            self.notify(InventoryChangeKind::Delete, blood_type);
        }
        Ok(removed)
    }

    #[cfg(test)]
    pub(crate) fn add_request(&self, request: BloodRequestRecord) -> Result<(), StoreError> {
        self.lock()?.requests.push(request);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn add_appointment(&self, appointment: AppointmentRecord) -> Result<(), StoreError> {
        self.lock()?.appointments.push(appointment);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn add_donation(&self, donation: DonationRecord) -> Result<(), StoreError> {
        self.lock()?.donations.push(donation);
        Ok(())
    }

    fn notify(&self, kind: InventoryChangeKind, blood_type: &str) {
        if let Some(feed) = &self.feed {
            feed.publish(InventoryChange {
                kind,
                blood_type: Some(blood_type.to_string()),
            });
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreTables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl BloodBankStore for InMemoryBloodBankStore {
    fn blood_type_record(&self, blood_type: &str) -> Result<Option<BloodTypeRecord>, StoreError> {
        Ok(self.lock()?.inventory.get(blood_type).cloned())
    }

    fn pending_requests(
        &self,
        filter: &PendingRequestFilter,
    ) -> Result<Vec<BloodRequestRecord>, StoreError> {
        Ok(self
            .lock()?
            .requests
            .iter()
            .filter(|request| request.status == RequestStatus::Pending)
            .filter(|request| filter.matches(request))
            .cloned()
            .collect())
    }

    fn appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentRecord>, StoreError> {
        Ok(self
            .lock()?
            .appointments
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
        Ok(self
            .lock()?
            .donations
            .iter()
            .filter(|donation| &donation.donor_id == donor_id)
            .max_by_key(|donation| donation.donation_date)
            .cloned())
    }

    fn blood_type_records(&self) -> Result<Vec<BloodTypeRecord>, StoreError> {
        Ok(self.lock()?.inventory.values().cloned().collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
