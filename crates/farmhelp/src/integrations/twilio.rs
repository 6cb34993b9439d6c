use serde::Deserialize;

use super::{endpoint, http_client, BoxFuture, IntegrationError};
use crate::config::TwilioConfig;

pub const DEFAULT_TWILIO_BASE_URL: &str = "https://api.twilio.com";

/// Places outbound voice calls to the configured alert number.
pub trait VoiceCaller: Send + Sync {
    /// Starts a call that speaks `twiml`, returning the provider's call id.
    fn call<'a>(&'a self, twiml: &'a str) -> BoxFuture<'a, Result<String, IntegrationError>>;
}

#[derive(Debug, Deserialize)]
struct CallResponse {
    #[serde(default)]
    sid: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<TwilioConfig>,
}

impl TwilioClient {
    pub fn new(credentials: Option<TwilioConfig>) -> Result<Self, IntegrationError> {
        Self::with_base_url(credentials, DEFAULT_TWILIO_BASE_URL)
    }

    pub fn with_base_url(
        credentials: Option<TwilioConfig>,
        base_url: impl Into<String>,
    ) -> Result<Self, IntegrationError> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.into(),
            credentials,
        })
    }

    async fn send(&self, twiml: &str) -> Result<String, IntegrationError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(IntegrationError::NotConfigured("twilio"))?;

        let form = [
            ("To", credentials.alert_number.as_str()),
            ("From", credentials.from_number.as_str()),
            ("Twiml", twiml),
        ];

        let response = self
            .http
            .post(endpoint(
                &self.base_url,
                &format!("2010-04-01/Accounts/{}/Calls.json", credentials.account_sid),
            ))
            .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        let body: CallResponse = response.json().await?;

        if !status.is_success() {
            return Err(IntegrationError::Api(
                body.message.unwrap_or_else(|| status.to_string()),
            ));
        }

        body.sid
            .ok_or_else(|| IntegrationError::Api("call response missing sid".into()))
    }
}

impl VoiceCaller for TwilioClient {
    fn call<'a>(&'a self, twiml: &'a str) -> BoxFuture<'a, Result<String, IntegrationError>> {
        Box::pin(self.send(twiml))
    }
}
