use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState};
use crate::routes::with_policy_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use equiprent::config::AppConfig;
use equiprent::error::AppError;
use equiprent::policy::{MarketplaceContext, RentalPolicyEngine};
use equiprent::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(config.catalog.csv_path.as_deref())?;
    let refund_tiers = config.policy.refund_tiers.len();
    let context = Arc::new(MarketplaceContext::new(
        RentalPolicyEngine::new(config.policy.clone()),
        catalog,
    ));
    let listings = context.catalog.len();

    let app = with_policy_routes(context)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        listings,
        refund_tiers,
        "rental policy service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
