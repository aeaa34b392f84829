use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::eligibility::{BloodRequestRecord, BloodTypeRecord, RequestStatus, UserId};

#[derive(Debug, Deserialize)]
struct InventoryRow {
    blood_type: String,
    quantity: u32,
    capacity: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RequestRow {
    blood_type: String,
    quantity: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    user_id: Option<String>,
}

#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    Timestamp { line: usize, value: String },
    Status { line: usize, value: String },
}

impl From<csv::Error> for RowError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) fn parse_inventory<R: Read>(
    reader: R,
    loaded_at: DateTime<Utc>,
) -> Result<Vec<BloodTypeRecord>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<InventoryRow>().enumerate() {
        let row = row?;
        let updated_at = match row.updated_at {
            Some(raw) => parse_timestamp(&raw).ok_or(RowError::Timestamp {
                line: index + 2,
                value: raw,
            })?,
            None => loaded_at,
        };

        records.push(BloodTypeRecord {
            blood_type: row.blood_type,
            quantity: row.quantity,
            capacity: row.capacity,
            updated_at,
        });
    }

    Ok(records)
}

pub(crate) fn parse_requests<R: Read>(reader: R) -> Result<Vec<BloodRequestRecord>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<RequestRow>().enumerate() {
        let row = row?;
        let status = match row.status {
            Some(raw) => raw.parse::<RequestStatus>().map_err(|_| RowError::Status {
                line: index + 2,
                value: raw,
            })?,
            None => RequestStatus::Pending,
        };

        records.push(BloodRequestRecord {
            blood_type: row.blood_type,
            quantity: row.quantity,
            status,
            user_id: row.user_id.map(UserId),
        });
    }

    Ok(records)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
