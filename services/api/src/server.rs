use crate::cli::ServeArgs;
use crate::infra::{in_memory_records, sensor_simulator, AppState, Integrations};
use crate::routes::with_farmhelp_routes;
use axum::http::HeaderValue;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use farmhelp::config::AppConfig;
use farmhelp::error::AppError;
use farmhelp::http::FarmHelpState;
use farmhelp::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.admin.password.is_none() {
        warn!("ADMIN_PANEL_PASSWORD is not set; admin login is disabled");
    }

    let integrations = Integrations::from_config(&config.integrations)?;
    let state = FarmHelpState {
        records: Arc::new(in_memory_records(&integrations)),
        sensors: sensor_simulator(),
        weather: integrations.weather.clone(),
        caller: integrations.caller.clone(),
        admin: Arc::new(config.admin.clone()),
    };

    let app = with_farmhelp_routes(state)
        .layer(Extension(app_state))
        .layer(cors_layer(config.server.frontend_url.as_deref()))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "farmhelp api ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Restricts CORS to the configured frontend. Unset, `*`, or an unparsable origin allows any.
pub(crate) fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = match frontend_url.map(str::trim) {
        None | Some("") | Some("*") => AllowOrigin::any(),
        Some(url) => match HeaderValue::from_str(url.trim_end_matches('/')) {
            Ok(value) => AllowOrigin::list([value]),
            Err(_) => {
                warn!(frontend_url = url, "FRONTEND_URL is not a valid origin; allowing any");
                AllowOrigin::any()
            }
        },
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
