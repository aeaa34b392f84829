use serde::{Deserialize, Serialize};

use super::domain::{
    AppointmentRecord, AppointmentStatus, BloodRequestRecord, BloodTypeRecord, DonationRecord,
    UserId,
};

/// Narrowing for pending blood request reads. Both fields unset means every pending request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequestFilter {
    pub blood_type: Option<String>,
    pub user_id: Option<UserId>,
}

impl PendingRequestFilter {
    pub fn for_blood_type(blood_type: &str) -> Self {
        Self {
            blood_type: Some(blood_type.to_string()),
            user_id: None,
        }
    }

    pub fn for_user(user_id: &UserId) -> Self {
        Self {
            blood_type: None,
            user_id: Some(user_id.clone()),
        }
    }

    pub fn matches(&self, request: &BloodRequestRecord) -> bool {
        self.blood_type
            .as_ref()
            .map_or(true, |blood_type| &request.blood_type == blood_type)
            && self
                .user_id
                .as_ref()
                .map_or(true, |user_id| request.user_id.as_ref() == Some(user_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub donor_id: UserId,
    pub status: AppointmentStatus,
}

/// Read-only view of the hosted data store the evaluators depend on.
pub trait BloodBankStore: Send + Sync {
    fn blood_type_record(&self, blood_type: &str) -> Result<Option<BloodTypeRecord>, StoreError>;
    /// Returns only requests whose status is pending.
    fn pending_requests(
        &self,
        filter: &PendingRequestFilter,
    ) -> Result<Vec<BloodRequestRecord>, StoreError>;
    fn appointments(&self, filter: &AppointmentFilter)
        -> Result<Vec<AppointmentRecord>, StoreError>;
    fn most_recent_donation(&self, donor_id: &UserId)
        -> Result<Option<DonationRecord>, StoreError>;
    /// Every inventory row, ordered by blood type label.
    fn blood_type_records(&self) -> Result<Vec<BloodTypeRecord>, StoreError>;
}

/// Error enumeration for store read failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("data store unavailable: {0}")]
    Unavailable(String),
    #[error("data store denied access: {0}")]
    PermissionDenied(String),
}
