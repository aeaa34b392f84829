use serde::{Deserialize, Serialize};

/// Screening thresholds and exclusion lists applied by the evaluators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub minimum_age: u32,
    pub maximum_age: u32,
    pub minimum_weight_kg: f64,
    pub donation_interval_days: i64,
    pub excluded_conditions: Vec<String>,
    pub excluded_medications: Vec<String>,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            minimum_age: 18,
            maximum_age: 65,
            minimum_weight_kg: 50.0,
            donation_interval_days: 56,
            excluded_conditions: [
                "HIV",
                "Hepatitis B",
                "Hepatitis C",
                "Syphilis",
                "Cancer",
                "Heart Disease",
            ]
            .map(String::from)
            .to_vec(),
            excluded_medications: ["Aspirin", "Warfarin", "Antibiotics", "Isotretinoin"]
                .map(String::from)
                .to_vec(),
        }
    }
}
