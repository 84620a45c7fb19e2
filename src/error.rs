//! Error types for Tutora
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Tutora operations
///
/// This enum encompasses all possible errors that can occur during
/// session setup, configuration loading, completion-service interactions,
/// and document text extraction.
#[derive(Error, Debug)]
pub enum TutoraError {
    /// Invalid construction-time parameters (e.g. a zero-capacity context window)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration-related errors (file loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion-service errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for a completion service
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Streaming not supported by the completion service
    #[error("Streaming is not supported by this provider")]
    StreamingNotSupported,

    /// Document text extraction errors (unparseable or corrupt documents)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Tutora operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let error = TutoraError::InvalidConfiguration("capacity must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: capacity must be positive"
        );
    }

    #[test]
    fn test_config_error_display() {
        let error = TutoraError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_provider_error_display() {
        let error = TutoraError::Provider("API timeout".to_string());
        assert_eq!(error.to_string(), "Provider error: API timeout");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = TutoraError::MissingCredentials("gemini".to_string());
        assert_eq!(error.to_string(), "Missing credentials for provider: gemini");
    }

    #[test]
    fn test_streaming_not_supported_error() {
        let error = TutoraError::StreamingNotSupported;
        assert_eq!(
            error.to_string(),
            "Streaming is not supported by this provider"
        );
    }

    #[test]
    fn test_extraction_error_display() {
        let error = TutoraError::Extraction("not a PDF".to_string());
        assert_eq!(error.to_string(), "Extraction error: not a PDF");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: TutoraError = io_error.into();
        assert!(matches!(error, TutoraError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "{invalid json}";
        let json_error = serde_json::from_str::<serde_json::Value>(json_str).unwrap_err();
        let error: TutoraError = json_error.into();
        assert!(matches!(error, TutoraError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "invalid: : yaml";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: TutoraError = yaml_error.into();
        assert!(matches!(error, TutoraError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TutoraError>();
    }
}
