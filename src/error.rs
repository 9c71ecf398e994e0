//! Error types for the credit report form

/// Errors raised by the form controller
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Step {0} is out of range (expected 1..={max})", max = crate::state::TOTAL_STEPS)]
    InvalidStep(u8),

    #[error("Cannot advance from step {requested}: current step is {current}")]
    StepMismatch { requested: u8, current: u8 },

    #[error("Step {0} is completed by submitting the form")]
    SubmitRequired(u8),

    #[error("A step transition is already in progress")]
    TransitionInProgress,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors returned by a submission endpoint
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HubSpot rejected the submission (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

impl From<reqwest::Error> for SubmissionError {
    fn from(err: reqwest::Error) -> Self {
        SubmissionError::Network(err.to_string())
    }
}

/// Configuration errors, raised at initialization
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid HubSpot portal id {0:?}: expected a non-empty numeric id")]
    InvalidPortalId(String),

    #[error("Invalid HubSpot form id {0:?}: expected a UUID")]
    InvalidFormId(String),

    #[error("Invalid endpoint base URL {0:?}")]
    InvalidEndpoint(String),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_step_message_names_range() {
        let err = FormError::InvalidStep(9);
        assert_eq!(
            err.to_string(),
            "Step 9 is out of range (expected 1..=6)"
        );
    }

    #[test]
    fn test_submission_error_converts_into_form_error() {
        let err: FormError = SubmissionError::Rejected {
            status: 400,
            message: "Email is invalid".to_string(),
        }
        .into();
        assert!(matches!(err, FormError::Submission(_)));
        assert!(err.to_string().contains("HTTP 400"));
    }

    #[test]
    fn test_config_error_converts_into_form_error() {
        let err: FormError = ConfigError::InvalidPortalId("abc".to_string()).into();
        assert!(matches!(err, FormError::Config(_)));
    }
}
