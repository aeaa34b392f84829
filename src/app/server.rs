use crate::app::cli::ServeArgs;
use crate::app::infra::{AppState, InMemoryBloodBankStore};
use crate::app::routes::{with_inventory_routes, InventoryState};
use crate::config::AppConfig;
use crate::eligibility::{EligibilityService, InventoryFeed, InventoryWatcher};
use crate::error::AppError;
use crate::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let feed = InventoryFeed::default();
    let store = InMemoryBloodBankStore::with_feed(feed.clone());
    store.seed_from_config(&config.store)?;

    let service = Arc::new(EligibilityService::new(
        Arc::new(store.clone()),
        config.policy.clone(),
    ));
    let watcher = InventoryWatcher::spawn(service.clone(), &feed);
    let inventory_state = InventoryState {
        store,
        snapshot: watcher.subscribe(),
    };

    let app = with_inventory_routes(service)
        .layer(Extension(inventory_state))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "blood bank eligibility service ready");

    let served = axum::serve(listener, app).await;
    watcher.shutdown();
    served?;
    Ok(())
}
