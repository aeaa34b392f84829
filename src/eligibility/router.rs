use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{HealthProfile, UrgencyLevel, UserId};
use super::repository::BloodBankStore;
use super::service::{EligibilityService, EligibilityServiceError};

#[derive(Debug, Deserialize)]
pub struct RequestEligibilityPayload {
    #[serde(default)]
    pub caller_id: Option<String>,
    pub urgency: UrgencyLevel,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentEligibilityPayload {
    #[serde(default)]
    pub caller_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(default)]
    pub units: Option<u32>,
}

/// Router builder exposing the eligibility and availability checks.
pub fn eligibility_router<S>(service: Arc<EligibilityService<S>>) -> Router
where
    S: BloodBankStore + 'static,
{
    Router::new()
        .route("/api/v1/eligibility/donation", post(donation_handler::<S>))
        .route("/api/v1/eligibility/request", post(request_handler::<S>))
        .route(
            "/api/v1/eligibility/appointment",
            post(appointment_handler::<S>),
        )
        .route("/api/v1/inventory", get(inventory_handler::<S>))
        .route(
            "/api/v1/inventory/:blood_type/availability",
            get(availability_handler::<S>),
        )
        .route(
            "/api/v1/compatibility/:blood_type",
            get(compatibility_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn donation_handler<S>(
    State(service): State<Arc<EligibilityService<S>>>,
    axum::Json(profile): axum::Json<HealthProfile>,
) -> Response
where
    S: BloodBankStore + 'static,
{
    let verdict = service.check_donation_eligibility(&profile);
    (StatusCode::OK, axum::Json(verdict)).into_response()
}

pub(crate) async fn request_handler<S>(
    State(service): State<Arc<EligibilityService<S>>>,
    axum::Json(payload): axum::Json<RequestEligibilityPayload>,
) -> Response
where
    S: BloodBankStore + 'static,
{
    let caller = caller_identity(payload.caller_id);
    match service.check_request_eligibility(caller.as_ref(), payload.urgency) {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(error) => unavailable_response(error),
    }
}

pub(crate) async fn appointment_handler<S>(
    State(service): State<Arc<EligibilityService<S>>>,
    axum::Json(payload): axum::Json<AppointmentEligibilityPayload>,
) -> Response
where
    S: BloodBankStore + 'static,
{
    let caller = caller_identity(payload.caller_id);
    match service.check_appointment_eligibility(caller.as_ref()) {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(error) => unavailable_response(error),
    }
}

pub(crate) async fn availability_handler<S>(
    State(service): State<Arc<EligibilityService<S>>>,
    Path(blood_type): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Response
where
    S: BloodBankStore + 'static,
{
    match service.check_availability(&blood_type, query.units.unwrap_or(1)) {
        Ok(availability) => (StatusCode::OK, axum::Json(availability)).into_response(),
        Err(error) => unavailable_response(error),
    }
}

pub(crate) async fn compatibility_handler<S>(
    State(service): State<Arc<EligibilityService<S>>>,
    Path(recipient): Path<String>,
) -> Response
where
    S: BloodBankStore + 'static,
{
    match service.check_compatible_blood_types(&recipient) {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(error) => unavailable_response(error),
    }
}

pub(crate) async fn inventory_handler<S>(
    State(service): State<Arc<EligibilityService<S>>>,
) -> Response
where
    S: BloodBankStore + 'static,
{
    match service.blood_inventory_with_requests() {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => unavailable_response(error),
    }
}

/// Blank identifiers count as anonymous.
fn caller_identity(raw: Option<String>) -> Option<UserId> {
    raw.map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .map(UserId)
}

fn unavailable_response(error: EligibilityServiceError) -> Response {
    let payload = json!({
        "error": "unable to check eligibility right now",
        "detail": error.to_string(),
    });
    (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
}
