use farmhelp::config::IntegrationsConfig;
use farmhelp::integrations::{
    CloudinaryClient, IntegrationError, OpenMeteoClient, TelegramNotifier, TwilioClient,
};
use farmhelp::records::{
    ApplicationForm, ContactForm, Farmer, InMemoryRecordRepository, RecordService,
};
use farmhelp::sensors::SensorSimulator;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Outbound clients built from configuration. Missing credentials leave a client in place that
/// reports itself as not configured.
pub(crate) struct Integrations {
    pub(crate) weather: Arc<OpenMeteoClient>,
    pub(crate) notifier: Arc<TelegramNotifier>,
    pub(crate) images: Arc<CloudinaryClient>,
    pub(crate) caller: Arc<TwilioClient>,
}

impl Integrations {
    pub(crate) fn from_config(config: &IntegrationsConfig) -> Result<Self, IntegrationError> {
        if config.telegram.is_none() {
            warn!("telegram credentials missing; form notifications disabled");
        }
        if config.cloudinary.is_none() {
            warn!("cloudinary credentials missing; photo uploads will fail");
        }
        if config.twilio.is_none() {
            warn!("twilio credentials missing; alert calls will fail");
        }

        Ok(Self {
            weather: Arc::new(OpenMeteoClient::new(config.weather_base_url.clone())?),
            notifier: Arc::new(TelegramNotifier::new(config.telegram.clone())?),
            images: Arc::new(CloudinaryClient::new(config.cloudinary.clone())?),
            caller: Arc::new(TwilioClient::new(config.twilio.clone())?),
        })
    }
}

/// Record service over in-process repositories.
pub(crate) fn in_memory_records(integrations: &Integrations) -> RecordService {
    info!("using in-memory record storage");
    RecordService::new(
        Arc::new(InMemoryRecordRepository::<Farmer>::default()),
        Arc::new(InMemoryRecordRepository::<ApplicationForm>::default()),
        Arc::new(InMemoryRecordRepository::<ContactForm>::default()),
        integrations.notifier.clone(),
        integrations.images.clone(),
    )
}

pub(crate) fn sensor_simulator() -> Arc<SensorSimulator> {
    Arc::new(SensorSimulator::new())
}
