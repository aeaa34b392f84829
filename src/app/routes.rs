use crate::app::infra::{AppState, InMemoryBloodBankStore};
use crate::eligibility::{
    eligibility_router, BloodTypeRecord, EligibilityService, InventoryReport, InventorySnapshot,
};
use crate::error::AppError;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;

/// Handles shared by the inventory dashboard and stock maintenance endpoints.
#[derive(Clone)]
pub(crate) struct InventoryState {
    pub(crate) store: InMemoryBloodBankStore,
    pub(crate) snapshot: watch::Receiver<InventorySnapshot>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StockUpdateRequest {
    pub(crate) quantity: u32,
    pub(crate) capacity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct InventoryDashboardResponse {
    pub(crate) generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) refreshed_at: Option<DateTime<Utc>>,
    pub(crate) report: InventoryReport,
}

pub(crate) fn with_inventory_routes(
    service: Arc<EligibilityService<InMemoryBloodBankStore>>,
) -> axum::Router {
    eligibility_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/dashboard/inventory", get(inventory_dashboard_endpoint))
        .route(
            "/api/v1/inventory/:blood_type/stock",
            put(update_stock_endpoint).delete(remove_stock_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Serves the watcher's latest snapshot rather than reading the store per request.
pub(crate) async fn inventory_dashboard_endpoint(
    Extension(inventory): Extension<InventoryState>,
) -> Json<InventoryDashboardResponse> {
    let snapshot = inventory.snapshot.borrow().clone();
    Json(InventoryDashboardResponse {
        generation: snapshot.generation,
        refreshed_at: snapshot.refreshed_at,
        report: InventoryReport::from_inventory(&snapshot.rows),
    })
}

pub(crate) async fn update_stock_endpoint(
    Extension(inventory): Extension<InventoryState>,
    Path(blood_type): Path<String>,
    Json(update): Json<StockUpdateRequest>,
) -> Result<Json<BloodTypeRecord>, AppError> {
    let record = inventory
        .store
        .upsert_inventory(&blood_type, update.quantity, update.capacity)?;
    Ok(Json(record))
}

pub(crate) async fn remove_stock_endpoint(
    Extension(inventory): Extension<InventoryState>,
    Path(blood_type): Path<String>,
) -> Result<StatusCode, AppError> {
    if inventory.store.remove_inventory(&blood_type)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}
