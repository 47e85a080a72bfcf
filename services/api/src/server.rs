use crate::cli::ServeArgs;
use crate::infra::{
    quota_config_with_default, AppState, InMemoryCapacityStore, InMemoryRegistrationStore,
};
use crate::routes::with_quota_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use harvest_quota::config::AppConfig;
use harvest_quota::error::AppError;
use harvest_quota::quota::QuotaEvaluator;
use harvest_quota::telemetry;
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
    if let Some(path) = args.limits_csv.take() {
        config.limits_csv = Some(path);
    }
    config.quota = quota_config_with_default(config.quota, args.default_max_farmers);

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let capacities = Arc::new(InMemoryCapacityStore::load(config.limits_csv.as_deref())?);
    let registrations = Arc::new(InMemoryRegistrationStore::default());
    let evaluator = Arc::new(QuotaEvaluator::new(
        capacities,
        registrations,
        config.quota.clone(),
    ));

    let app = with_quota_routes(evaluator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_max_farmers = config.quota.default_max_farmers,
        warning_threshold = config.quota.warning_threshold,
        "harvest quota service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
