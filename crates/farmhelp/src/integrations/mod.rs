//! Outbound integrations. Each collaborator sits behind a small trait so handlers and tests
//! can swap the HTTP clients for fakes.

pub mod cloudinary;
pub mod messages;
pub mod telegram;
pub mod twilio;
pub mod weather;

use std::future::Future;
use std::pin::Pin;

pub use cloudinary::{CloudinaryClient, ImageHost};
pub use telegram::{Notifier, TelegramNotifier};
pub use twilio::{TwilioClient, VoiceCaller};
pub use weather::{CurrentWeather, OpenMeteoClient, WeatherProvider};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const USER_AGENT: &str = concat!("farmhelp/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

fn http_client() -> Result<reqwest::Client, IntegrationError> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}
