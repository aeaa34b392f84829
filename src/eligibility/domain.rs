use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for authenticated callers (donors, patients, hospital staff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ABO/Rh classification used for transfusion compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "AB-")]
    ABNegative,
    #[serde(rename = "AB+")]
    ABPositive,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::ONegative,
        BloodType::OPositive,
        BloodType::ANegative,
        BloodType::APositive,
        BloodType::BNegative,
        BloodType::BPositive,
        BloodType::ABNegative,
        BloodType::ABPositive,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            BloodType::ONegative => "O-",
            BloodType::OPositive => "O+",
            BloodType::ANegative => "A-",
            BloodType::APositive => "A+",
            BloodType::BNegative => "B-",
            BloodType::BPositive => "B+",
            BloodType::ABNegative => "AB-",
            BloodType::ABPositive => "AB+",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blood type '{0}'")]
pub struct ParseBloodTypeError(pub String);

impl FromStr for BloodType {
    type Err = ParseBloodTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // Accept the typographic minus used on printed labels.
        let normalized = value.trim().replace('\u{2212}', "-").to_ascii_uppercase();
        BloodType::ALL
            .into_iter()
            .find(|blood_type| blood_type.label() == normalized)
            .ok_or_else(|| ParseBloodTypeError(value.to_string()))
    }
}

/// Urgency tier attached to a blood request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Routine,
    Urgent,
    Emergency,
}

impl UrgencyLevel {
    pub const fn label(self) -> &'static str {
        match self {
            UrgencyLevel::Routine => "routine",
            UrgencyLevel::Urgent => "urgent",
            UrgencyLevel::Emergency => "emergency",
        }
    }

    /// Urgent and emergency requests are only accepted while some inventory exists.
    pub const fn requires_inventory(self) -> bool {
        matches!(self, UrgencyLevel::Urgent | UrgencyLevel::Emergency)
    }
}

impl FromStr for UrgencyLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "routine" => Ok(UrgencyLevel::Routine),
            "urgent" => Ok(UrgencyLevel::Urgent),
            "emergency" => Ok(UrgencyLevel::Emergency),
            other => Err(format!(
                "unknown urgency '{other}' (expected routine, urgent, or emergency)"
            )),
        }
    }
}

/// Self-reported donor health data. Every optional field is neutral when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthProfile {
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub last_donation_date: Option<NaiveDate>,
    pub medical_conditions: Vec<String>,
    pub medications: Vec<String>,
    pub recent_surgery: bool,
    pub recent_tattoo: bool,
    pub recent_travel: bool,
}

/// Inventory row owned by the data store. `blood_type` stays a free-form key so unknown
/// labels pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodTypeRecord {
    pub blood_type: String,
    pub quantity: u32,
    pub capacity: u32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Fulfilled,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Fulfilled => "fulfilled",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "fulfilled" => Ok(RequestStatus::Fulfilled),
            other => Err(format!("unknown request status '{other}'")),
        }
    }
}

/// Blood request row as stored; the engine only ever reads pending ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodRequestRecord {
    pub blood_type: String,
    pub quantity: u32,
    pub status: RequestStatus,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub donor_id: UserId,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRecord {
    pub donor_id: UserId,
    pub donation_date: NaiveDate,
}
