use axum::http::StatusCode;
use thiserror::Error;

/// Message returned to HTTP clients when no service credential is configured.
pub const MISSING_API_KEY_MESSAGE: &str = "Missing Google API key";

/// Message returned to HTTP clients for every other failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Missing Google API key")]
    MissingApiKey,

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {message}")]
    UpstreamStatus { status: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Upstream,
    Data,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlacesError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlacesError::MissingApiKey
            | PlacesError::ConfigError { .. }
            | PlacesError::MissingConfigError { .. }
            | PlacesError::InvalidConfigValueError { .. }
            | PlacesError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            PlacesError::ApiError(_) => ErrorCategory::Network,
            PlacesError::UpstreamStatus { .. } => ErrorCategory::Upstream,
            PlacesError::CsvError(_)
            | PlacesError::IoError(_)
            | PlacesError::SerializationError(_) => ErrorCategory::Data,
            PlacesError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一類別失敗不影響整體請求
            ErrorCategory::Upstream => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlacesError::MissingApiKey => {
                "No Google Places API key is configured".to_string()
            }
            PlacesError::ApiError(e) => format!("Could not reach the places service: {}", e),
            PlacesError::UpstreamStatus { status, .. } => {
                format!("The places service rejected the search ({})", status)
            }
            PlacesError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            PlacesError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Set GOOGLE_PLACES_API_KEY or check the configuration file"
            }
            ErrorCategory::Network => "Check network connectivity and the places endpoint URL",
            ErrorCategory::Upstream => "Check the API key quota and the query parameters",
            ErrorCategory::Data => "Check the output path and file permissions",
            ErrorCategory::Validation => "Check the search parameters",
        }
    }

    /// HTTP status reported by the request handler. Every failure class is a 500.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Error text exposed to HTTP clients; internal details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            PlacesError::MissingApiKey => MISSING_API_KEY_MESSAGE,
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlacesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_critical_configuration_error() {
        let err = PlacesError::MissingApiKey;
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.public_message(), "Missing Google API key");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_status_hides_details_from_clients() {
        let err = PlacesError::UpstreamStatus {
            status: "REQUEST_DENIED".to_string(),
            message: "The provided API key is invalid.".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Upstream);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.user_friendly_message().contains("REQUEST_DENIED"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = PlacesError::ValidationError {
            message: "limit must be at least 1".to_string(),
        };
        assert_eq!(err.to_string(), "Validation error: limit must be at least 1");
        assert_eq!(err.recovery_suggestion(), "Check the search parameters");
    }
}
