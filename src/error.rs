//! Error types and handling for the `skycast` application

use thiserror::Error;

/// Main error type for the `skycast` application
#[derive(Error, Debug)]
pub enum SkycastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// No geocoding match for a place name or postal code
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Network or transport failure on an upstream call
    #[error("Upstream unreachable: {message}")]
    Unreachable { message: String },

    /// Upstream responded, but the payload was malformed or out of range
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SkycastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new unreachable error
    pub fn unreachable<S: Into<String>>(message: S) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Create a new invalid-response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    ///
    /// Not-found reasons are preserved verbatim: "zip not found" and
    /// "city not found" must stay distinguishable for the caller.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycastError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            SkycastError::NotFound { message } => message.clone(),
            SkycastError::Unreachable { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            SkycastError::InvalidResponse { .. } => {
                "The weather service returned unexpected data. Please try again.".to_string()
            }
            SkycastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SkycastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = SkycastError::config("missing API key");
        assert!(matches!(config_err, SkycastError::Config { .. }));

        let not_found_err = SkycastError::not_found("City not found. Please try again.");
        assert!(matches!(not_found_err, SkycastError::NotFound { .. }));

        let unreachable_err = SkycastError::unreachable("connection refused");
        assert!(matches!(unreachable_err, SkycastError::Unreachable { .. }));

        let validation_err = SkycastError::validation("invalid coordinates");
        assert!(matches!(validation_err, SkycastError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = SkycastError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let unreachable_err = SkycastError::unreachable("test");
        assert!(unreachable_err.user_message().contains("Unable to reach"));

        let validation_err = SkycastError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_not_found_reasons_stay_distinct() {
        let zip = SkycastError::not_found("Zipcode not found. Please try again.");
        let city = SkycastError::not_found("City not found. Please try again.");
        assert_ne!(zip.user_message(), city.user_message());
        assert!(zip.user_message().contains("Zipcode"));
        assert!(city.user_message().contains("City"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let skycast_err: SkycastError = io_err.into();
        assert!(matches!(skycast_err, SkycastError::Io { .. }));
    }
}
