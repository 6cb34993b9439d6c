use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{ApiError, ApiJson, ApiQuery, FarmHelpState};
use crate::agronomy::{score_crops, Coordinates, SuitabilityResult};
use crate::integrations::messages::TANK_OVERFLOW_TWIML;
use crate::integrations::CurrentWeather;
use crate::sensors::{SensorError, SensorReading};

const CALL_TRIGGER_CODE: &str = "1";

#[derive(Debug, Deserialize)]
pub(crate) struct CropPredictionRequest {
    coordinates: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SensorQuery {
    #[serde(default)]
    sensor_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CallTriggerRequest {
    request_code: String,
}

/// Top three crops for the current weather at the given coordinates.
pub(crate) async fn crop_prediction(
    State(state): State<FarmHelpState>,
    ApiJson(request): ApiJson<CropPredictionRequest>,
) -> Result<Json<Vec<SuitabilityResult>>, ApiError> {
    let coordinates = Coordinates::parse(&request.coordinates)?;

    let weather = match state.weather.current(coordinates).await {
        Ok(weather) => weather,
        Err(error) => {
            warn!(%error, "weather lookup failed; using default conditions");
            CurrentWeather::default()
        }
    };
    let (temperature, humidity) = weather.or_defaults();

    let ranked = score_crops(
        temperature,
        humidity,
        coordinates.latitude,
        coordinates.longitude,
    );
    info!(
        latitude = coordinates.latitude,
        longitude = coordinates.longitude,
        temperature,
        humidity,
        "crop suitability scored"
    );

    Ok(Json(ranked))
}

pub(crate) async fn sensor_data(
    State(state): State<FarmHelpState>,
    ApiQuery(query): ApiQuery<SensorQuery>,
) -> Result<Json<SensorReading>, ApiError> {
    let sensor_id = query.sensor_id.ok_or(SensorError::EmptySensorId)?;
    Ok(Json(state.sensors.read_sensor(&sensor_id)?))
}

pub(crate) async fn trigger_test_call(
    State(state): State<FarmHelpState>,
    ApiJson(request): ApiJson<CallTriggerRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.request_code != CALL_TRIGGER_CODE {
        return Ok(Json(json!({
            "success": false,
            "message": "hey post 1 to call",
        })));
    }

    let call_sid = state
        .caller
        .call(TANK_OVERFLOW_TWIML)
        .await
        .map_err(|err| {
            warn!(%err, "alert call failed");
            ApiError::internal(format!("Twilio Error: {err}"))
        })?;

    info!(%call_sid, "alert call initiated");
    Ok(Json(json!({
        "success": true,
        "message": "Call initiated successfully",
        "call_sid": call_sid,
    })))
}
