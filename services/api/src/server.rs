use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::registry_router;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use market_registry::config::AppConfig;
use market_registry::error::AppError;
use market_registry::registry::{RegistryError, RegistryService, RegistryStore};
use market_registry::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = RegistryStore::open(&config.database.path).map_err(RegistryError::from)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        registry: Arc::new(RegistryService::new(Arc::new(store))),
    };

    let app = registry_router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, database = %config.database.path.display(), "market registry ready");

    axum::serve(listener, app).await?;
    Ok(())
}
