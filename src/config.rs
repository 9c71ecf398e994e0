//! Configuration handling for the form

use crate::error::ConfigError;
use crate::hubspot::{hutk_from_cookie_header, HubSpotConfig, SubmissionContext};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default page URI reported with submissions
pub const DEFAULT_PAGE_URI: &str = "https://bizcred.com/credit-report";

/// Default page name reported with submissions
pub const DEFAULT_PAGE_NAME: &str = "Business Credit Report";

/// Initialization options recognized by the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitConfig {
    /// Overrides the HubSpot portal (tenant) id
    pub portal_id: Option<String>,
    /// Overrides the HubSpot form id
    pub form_id: Option<String>,
    /// Overrides the API host, mainly for tests
    pub endpoint_base: Option<String>,
}

impl InitConfig {
    /// Validate into an endpoint identity
    pub fn resolve(&self) -> Result<HubSpotConfig, ConfigError> {
        HubSpotConfig::resolve(
            self.portal_id.as_deref(),
            self.form_id.as_deref(),
            self.endpoint_base.as_deref(),
        )
    }
}

/// User configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HubSpot portal id
    pub portal_id: Option<String>,
    /// HubSpot form id
    pub form_id: Option<String>,
    /// HubSpot API host
    pub endpoint_base: Option<String>,
    /// Page URI sent in the submission context
    pub page_uri: Option<String>,
    /// Page name sent in the submission context
    pub page_name: Option<String>,
    /// Cookie header to read the `hubspotutk` visitor token from
    pub cookie: Option<String>,
    /// GA4 measurement id; analytics is logged only when unset
    pub ga4_measurement_id: Option<String>,
    /// GA4 Measurement Protocol API secret
    pub ga4_api_secret: Option<String>,
    /// Log filter, e.g. `bizcred_tui=debug`
    pub log_level: Option<String>,
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "bizcred", "bizcred-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Directory for log files
    pub fn logs_dir() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.data_local_dir().join("logs"))
            .unwrap_or_else(|| std::env::temp_dir().join("bizcred-tui"))
    }

    /// Load the config file (if any), then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// `BIZCRED_*` variables win over the file
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("BIZCRED_PORTAL_ID") {
            self.portal_id = Some(v);
        }
        if let Some(v) = lookup("BIZCRED_FORM_ID") {
            self.form_id = Some(v);
        }
        if let Some(v) = lookup("BIZCRED_ENDPOINT_BASE") {
            self.endpoint_base = Some(v);
        }
        if let Some(v) = lookup("BIZCRED_COOKIE") {
            self.cookie = Some(v);
        }
    }

    pub fn init_config(&self) -> InitConfig {
        InitConfig {
            portal_id: self.portal_id.clone(),
            form_id: self.form_id.clone(),
            endpoint_base: self.endpoint_base.clone(),
        }
    }

    /// Context block for submissions; a missing cookie yields an empty token
    pub fn submission_context(&self) -> SubmissionContext {
        SubmissionContext {
            hutk: self
                .cookie
                .as_deref()
                .map(hutk_from_cookie_header)
                .unwrap_or_default(),
            page_uri: self
                .page_uri
                .clone()
                .unwrap_or_else(|| DEFAULT_PAGE_URI.to_string()),
            page_name: self
                .page_name
                .clone()
                .unwrap_or_else(|| DEFAULT_PAGE_NAME.to_string()),
        }
    }

    /// GA4 credentials when both halves are present
    pub fn ga4_credentials(&self) -> Option<(&str, &str)> {
        match (&self.ga4_measurement_id, &self.ga4_api_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }
}
