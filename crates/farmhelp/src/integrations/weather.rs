use serde::Deserialize;

use super::{endpoint, http_client, BoxFuture, IntegrationError};
use crate::agronomy::Coordinates;

pub const DEFAULT_TEMPERATURE: f64 = 25.0;
pub const DEFAULT_HUMIDITY: f64 = 50.0;

/// Current conditions; either field may be missing from the provider's answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    #[serde(default)]
    pub relative_humidity_2m: Option<f64>,
}

impl CurrentWeather {
    /// `(temperature, relative_humidity)` with per-field fallbacks of 25 °C and 50 %.
    pub fn or_defaults(&self) -> (f64, f64) {
        (
            self.temperature_2m.unwrap_or(DEFAULT_TEMPERATURE),
            self.relative_humidity_2m.unwrap_or(DEFAULT_HUMIDITY),
        )
    }
}

pub trait WeatherProvider: Send + Sync {
    fn current(
        &self,
        coordinates: Coordinates,
    ) -> BoxFuture<'_, Result<CurrentWeather, IntegrationError>>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<CurrentWeather>,
}

/// Open-Meteo forecast API client.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, IntegrationError> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.into(),
        })
    }

    async fn fetch(&self, coordinates: Coordinates) -> Result<CurrentWeather, IntegrationError> {
        let query = [
            ("latitude", coordinates.latitude.to_string()),
            ("longitude", coordinates.longitude.to_string()),
            (
                "current",
                "temperature_2m,relative_humidity_2m".to_string(),
            ),
        ];

        let response = self
            .http
            .get(endpoint(&self.base_url, "v1/forecast"))
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let forecast: ForecastResponse = response.json().await?;

        Ok(forecast.current.unwrap_or_default())
    }
}

impl WeatherProvider for OpenMeteoClient {
    fn current(
        &self,
        coordinates: Coordinates,
    ) -> BoxFuture<'_, Result<CurrentWeather, IntegrationError>> {
        Box::pin(self.fetch(coordinates))
    }
}
