use super::super::domain::UrgencyLevel;
use super::verdict::Disqualification;

pub(crate) fn required_documents(urgency: UrgencyLevel) -> Vec<String> {
    let documents: &[&str] = match urgency {
        UrgencyLevel::Routine => &[
            "Medical prescription",
            "Blood type confirmation",
            "Valid ID",
            "Insurance documentation",
        ],
        UrgencyLevel::Urgent => &[
            "Medical prescription",
            "Hospital documentation",
            "Blood type confirmation",
            "Valid ID",
        ],
        UrgencyLevel::Emergency => &["Emergency medical authorization", "Valid ID"],
    };
    documents.iter().map(|document| document.to_string()).collect()
}

/// `inventory_records` is only consulted for urgencies that require stock on hand.
pub(crate) fn assess_request(
    urgency: UrgencyLevel,
    pending_requests: usize,
    inventory_records: Option<usize>,
) -> Vec<Disqualification> {
    let mut disqualifications = Vec::new();

    if pending_requests > 0 && urgency != UrgencyLevel::Emergency {
        disqualifications.push(Disqualification::PendingRequestExists);
    }

    // Existence of any inventory row is enough; per-type sufficiency is not checked here.
    if urgency.requires_inventory() && inventory_records == Some(0) {
        disqualifications.push(Disqualification::NoInventoryForUrgentRequest);
    }

    disqualifications
}
