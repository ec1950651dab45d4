//! Error types for the API boundary and their operator-facing messages.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request failed with status {status}")]
    Status {
        status: u16,
        /// `message` field of the JSON error body, if any.
        message: Option<String>,
    },

    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    #[error("Unexpected response from server: {message}")]
    Decode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ApiError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Message to show in a toast: the server's own words when it sent any,
    /// otherwise the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::SessionExpired => self.to_string(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::Decode {
                message: err.to_string(),
            };
        }
        if let Some(status) = err.status() {
            return ApiError::Status {
                status: status.as_u16(),
                message: None,
            };
        }
        ApiError::Network {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Status {
            status: 409,
            message: Some("Already registered".into()),
        };
        assert_eq!(
            err.user_message("Failed to complete registration"),
            "Already registered"
        );

        let err = ApiError::Status {
            status: 500,
            message: Some("   ".into()),
        };
        assert_eq!(
            err.user_message("Failed to complete registration"),
            "Failed to complete registration"
        );
    }

    #[test]
    fn test_network_error_uses_fallback() {
        let err = ApiError::Network {
            message: "connection refused".into(),
        };
        assert_eq!(err.user_message("Failed to fetch events"), "Failed to fetch events");
        assert!(err.server_message().is_none());
    }

    #[test]
    fn test_session_expired_message() {
        assert_eq!(
            ApiError::SessionExpired.user_message("ignored"),
            "Your session has expired. Please log in again."
        );
    }
}
