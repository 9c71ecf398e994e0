//! Analytics sink implementations

use super::{AnalyticsEvent, AnalyticsSink};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Default GA4 Measurement Protocol endpoint
pub const GA4_ENDPOINT: &str = "https://www.google-analytics.com/mp/collect";

/// Prepended to every event name sent to GA4
pub const GA4_EVENT_PREFIX: &str = "BizCred - ";

/// Log-only sink used when no analytics backend is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn track(&self, event: &AnalyticsEvent) {
        let params = serde_json::Value::Object(event.params());
        tracing::info!(event = event.name(), %params, "analytics event (no sink configured)");
    }
}

/// Sends events to GA4 through the Measurement Protocol.
///
/// Each event is posted on a spawned task; failures are logged and dropped.
#[derive(Debug, Clone)]
pub struct Ga4Sink {
    client: reqwest::Client,
    endpoint: String,
    measurement_id: String,
    api_secret: String,
    client_id: String,
}

impl Ga4Sink {
    pub fn new(measurement_id: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: GA4_ENDPOINT.to_string(),
            measurement_id: measurement_id.into(),
            api_secret: api_secret.into(),
            client_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Override the collection endpoint (used by tests)
    #[allow(dead_code)]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn body(&self, event: &AnalyticsEvent) -> serde_json::Value {
        json!({
            "client_id": self.client_id,
            "events": [{
                "name": format!("{GA4_EVENT_PREFIX}{}", event.name()),
                "params": event.params(),
            }],
        })
    }
}

impl AnalyticsSink for Ga4Sink {
    fn track(&self, event: &AnalyticsEvent) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(event = event.name(), "no runtime; dropping GA4 event");
            return;
        };

        let request = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("measurement_id", self.measurement_id.as_str()),
                ("api_secret", self.api_secret.as_str()),
            ])
            .json(&self.body(event));
        let name = event.name();

        handle.spawn(async move {
            match request.send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(event = name, "GA4 event sent");
                }
                Ok(resp) => {
                    tracing::warn!(event = name, status = %resp.status(), "GA4 rejected event");
                }
                Err(e) => {
                    tracing::warn!(event = name, error = %e, "Failed to send GA4 event");
                }
            }
        });
    }
}

/// Keeps every event in memory; shared clones see the same log
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(AnalyticsEvent::name).collect()
    }

    /// Number of recorded events with the given name
    pub fn count(&self, name: &str) -> usize {
        self.events().iter().filter(|e| e.name() == name).count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl AnalyticsSink for RecordingSink {
    fn track(&self, event: &AnalyticsEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
