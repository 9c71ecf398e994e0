//! HTTP client for the HubSpot forms submission API

use super::payload::SubmissionPayload;
use super::traits::SubmissionEndpoint;
use crate::error::{ConfigError, SubmissionError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Default HubSpot API host
pub const DEFAULT_ENDPOINT_BASE: &str = "https://api.hsforms.com";

/// Built-in portal (tenant) id
pub const DEFAULT_PORTAL_ID: &str = "19654160";

/// Built-in form id
pub const DEFAULT_FORM_ID: &str = "93c4b42b-df7d-4590-8b03-b813655465ab";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Validated endpoint identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSpotConfig {
    pub portal_id: String,
    pub form_id: String,
    pub endpoint_base: String,
}

impl HubSpotConfig {
    /// Build and validate an endpoint identity, falling back to the built-in
    /// ids for anything not supplied.
    pub fn resolve(
        portal_id: Option<&str>,
        form_id: Option<&str>,
        endpoint_base: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let portal_id = portal_id.unwrap_or(DEFAULT_PORTAL_ID).trim().to_string();
        let form_id = form_id.unwrap_or(DEFAULT_FORM_ID).trim().to_string();
        let endpoint_base = endpoint_base
            .unwrap_or(DEFAULT_ENDPOINT_BASE)
            .trim()
            .trim_end_matches('/')
            .to_string();

        if portal_id.is_empty() || !portal_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidPortalId(portal_id));
        }
        if uuid::Uuid::parse_str(&form_id).is_err() {
            return Err(ConfigError::InvalidFormId(form_id));
        }
        if !(endpoint_base.starts_with("https://") || endpoint_base.starts_with("http://")) {
            return Err(ConfigError::InvalidEndpoint(endpoint_base));
        }

        let config = Self {
            portal_id,
            form_id,
            endpoint_base,
        };
        // The full submit URL must parse, host included
        if reqwest::Url::parse(&config.endpoint()).is_err() {
            return Err(ConfigError::InvalidEndpoint(config.endpoint_base));
        }
        Ok(config)
    }

    /// Full submit URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/submissions/v3/integration/submit/{}/{}",
            self.endpoint_base, self.portal_id, self.form_id
        )
    }
}

impl Default for HubSpotConfig {
    fn default() -> Self {
        Self {
            portal_id: DEFAULT_PORTAL_ID.to_string(),
            form_id: DEFAULT_FORM_ID.to_string(),
            endpoint_base: DEFAULT_ENDPOINT_BASE.to_string(),
        }
    }
}

/// Error body returned by HubSpot on rejection
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ErrorBody {
    fn summary(&self, status: u16) -> String {
        let details: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        if !details.is_empty() {
            details.join(" ")
        } else if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            message.to_string()
        } else {
            format!("HTTP error {status} with no JSON body.")
        }
    }
}

/// Client for the HubSpot forms API
#[derive(Debug, Clone)]
pub struct HubSpotClient {
    client: reqwest::Client,
    config: HubSpotConfig,
}

impl HubSpotClient {
    pub fn new(config: HubSpotConfig) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SubmissionEndpoint for HubSpotClient {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmissionError> {
        let url = self.config.endpoint();
        tracing::debug!(%url, fields = payload.fields.len(), "Submitting form to HubSpot");

        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::info!(status = status.as_u16(), "HubSpot accepted submission");
            return Ok(());
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = body.summary(status.as_u16());
        tracing::error!(status = status.as_u16(), %message, "HubSpot API error response");
        Err(SubmissionError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
