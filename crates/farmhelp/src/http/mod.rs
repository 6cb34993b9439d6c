//! HTTP surface: route table, shared state, and error rendering.

mod admin;
mod demo;
pub mod error;
mod extract;
mod records;


use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, MethodRouter};
use axum::Router;

use crate::config::AdminConfig;
use crate::integrations::{VoiceCaller, WeatherProvider};
use crate::records::RecordService;
use crate::sensors::SensorSimulator;

pub use error::ApiError;
pub use extract::{ApiJson, ApiQuery};

/// Multipart farmer submissions carry photos, so they get a larger body limit.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Everything the handlers need, cloned per request.
#[derive(Clone)]
pub struct FarmHelpState {
    pub records: Arc<RecordService>,
    pub sensors: Arc<SensorSimulator>,
    pub weather: Arc<dyn WeatherProvider>,
    pub caller: Arc<dyn VoiceCaller>,
    pub admin: Arc<AdminConfig>,
}

/// Router builder exposing every FarmHelp endpoint under the paths the web client uses.
pub fn farmhelp_router(state: FarmHelpState) -> Router {
    let uploads = Router::new()
        .route("/adminaddfarmerdata", post(records::add_farmer))
        .route("/adminaddfarmerdata/", post(records::add_farmer))
        .route(
            "/adminaddfarmerdata/upload-image",
            post(records::upload_farm_image),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    let router = Router::new()
        .route("/", get(admin::root))
        .route("/verify-admin", post(admin::verify_admin))
        .route(
            "/adminfarmerdata/:id",
            get(records::get_farmer)
                .put(records::update_farmer)
                .delete(records::delete_farmer),
        )
        .route(
            "/adminapplicationfoamdata/:id",
            axum::routing::delete(records::delete_application),
        )
        .route(
            "/admincontactfoamdata/:id",
            axum::routing::delete(records::delete_contact),
        );

    let router = collection(router, "/adminfarmerdata", get(records::list_farmers));
    let router = collection(router, "/farmerdata", post(records::farmer_by_mobile));
    let router = collection(
        router,
        "/submitapplicationfoamdata",
        post(records::submit_application),
    );
    let router = collection(
        router,
        "/adminapplicationfoamdata",
        get(records::list_applications),
    );
    let router = collection(
        router,
        "/submitcontactfoamdata",
        post(records::submit_contact),
    );
    let router = collection(router, "/admincontactfoamdata", get(records::list_contacts));
    let router = collection(router, "/democropprediction", post(demo::crop_prediction));
    let router = collection(router, "/demosenserdata", get(demo::sensor_data));
    let router = collection(router, "/twilio-test", post(demo::trigger_test_call));

    router.merge(uploads).with_state(state)
}

/// Registers `path` with and without a trailing slash.
fn collection(
    router: Router<FarmHelpState>,
    path: &str,
    handler: MethodRouter<FarmHelpState>,
) -> Router<FarmHelpState> {
    router
        .route(path, handler.clone())
        .route(&format!("{path}/"), handler)
}
