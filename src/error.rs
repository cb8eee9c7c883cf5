//! Error types for Reflect Assist.
//!
//! Every failure ends up in front of the user as one of three things: inline
//! validation text, a generic "try again" prompt, or a rate-limit notice.
//! [`Error::user_message`] performs that collapse.

use std::time::Duration;

/// Shown for any network or backend failure that isn't rate limiting.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Shown when the backend answers 429.
pub const RATE_LIMITED_MESSAGE: &str = "Too many attempts. Please try again later.";

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// The string the UI should display for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Flow(e) => e.to_string(),
            Self::Api(e) => e.user_message().to_string(),
            Self::Config(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Whether retrying the same action could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_retryable())
    }
}

/// Synchronous input validation failures. `Display` is the inline text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please enter a valid phone number.")]
    InvalidPhone,

    #[error("Please enter a valid email address or phone number.")]
    InvalidContact,

    #[error("Please enter the 6-digit code.")]
    InvalidCode,

    #[error("{field} is required.")]
    Required { field: String },
}

/// Wizard sequencing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("The {flow} flow is already finished")]
    Finished { flow: String },

    #[error("Step {step} expects {expected}")]
    UnexpectedAnswer {
        step: String,
        expected: &'static str,
    },

    #[error("\"{option}\" is not an option for {step}")]
    UnknownOption { step: String, option: String },

    #[error("Step {step} has not been answered yet")]
    NotAnswered { step: String },

    #[error("Already at the first step")]
    AtStart,
}

/// Failures talking to the reflection backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Unauthorized (status {status})")]
    Unauthorized { status: u16 },

    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The user-facing message for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => RATE_LIMITED_MESSAGE,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited { .. } => true,
            Self::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_text_is_shown_inline() {
        let err = Error::from(ValidationError::InvalidEmail);
        assert_eq!(err.user_message(), "Please enter a valid email address.");

        let err = Error::from(ValidationError::Required {
            field: "Recipient name".into(),
        });
        assert_eq!(err.user_message(), "Recipient name is required.");
    }

    #[test]
    fn rate_limit_has_its_own_message() {
        let err = Error::from(ApiError::RateLimited { retry_after: None });
        assert_eq!(err.user_message(), RATE_LIMITED_MESSAGE);
        assert!(err.is_retryable());
    }

    #[test]
    fn other_api_failures_are_generic() {
        let cases = [
            ApiError::Network("connection refused".into()),
            ApiError::Unauthorized { status: 401 },
            ApiError::RequestFailed {
                status: 500,
                body: "boom".into(),
            },
            ApiError::InvalidResponse("not json".into()),
        ];
        for api in cases {
            let err = Error::from(api);
            assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!ApiError::RequestFailed {
            status: 400,
            body: String::new()
        }
        .is_retryable());
        assert!(ApiError::RequestFailed {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!ApiError::Unauthorized { status: 403 }.is_retryable());
    }
}
