//! Error handling module for the dashboard client.
//!
//! Provides one error type for every hook, the session store and the export
//! trigger, with stable codes the views can branch on.

use reqwest::StatusCode;
use thiserror::Error;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const AUTHENTICATION_REQUIRED: &str = "AUTHENTICATION_REQUIRED";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Client-side error type.
#[derive(Debug, Clone, Error)]
pub enum PortalError {
    /// A token-requiring operation ran without an active session
    #[error("authentication required: {0}")]
    AuthenticationRequired(String),
    /// The backend rejected the bearer token
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Transport failure or timeout
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response from the backend
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// Form-level validation before submission
    #[error("validation error: {0}")]
    Validation(String),
    /// Response body did not have the expected shape
    #[error("decode error: {0}")]
    Decode(String),
    /// Durable storage failure
    #[error("storage error: {0}")]
    Storage(String),
    /// Invalid configuration value
    #[error("config error: {0}")]
    Config(String),
}

impl PortalError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            PortalError::AuthenticationRequired(_) => codes::AUTHENTICATION_REQUIRED,
            PortalError::Unauthorized(_) => codes::UNAUTHORIZED,
            PortalError::Network(_) => codes::NETWORK_ERROR,
            PortalError::Server { .. } => codes::SERVER_ERROR,
            PortalError::Validation(_) => codes::VALIDATION_ERROR,
            PortalError::Decode(_) => codes::DECODE_ERROR,
            PortalError::Storage(_) => codes::STORAGE_ERROR,
            PortalError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            PortalError::AuthenticationRequired(msg)
            | PortalError::Unauthorized(msg)
            | PortalError::Network(msg)
            | PortalError::Validation(msg)
            | PortalError::Decode(msg)
            | PortalError::Storage(msg)
            | PortalError::Config(msg) => msg.clone(),
            PortalError::Server { message, .. } => message.clone(),
        }
    }

    /// Build an error from a non-success HTTP status and the backend message.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == StatusCode::UNAUTHORIZED {
            PortalError::Unauthorized(message)
        } else {
            PortalError::Server {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// Whether the transport policy may retry the request that produced this error.
    ///
    /// Only transport failures and 5xx responses qualify; 4xx answers are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            PortalError::Network(_) => true,
            PortalError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Shorthand for the error every token-requiring operation raises.
    pub fn auth_required(operation: &str) -> Self {
        PortalError::AuthenticationRequired(format!("{} requires an active session", operation))
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        tracing::debug!("HTTP error: {:?}", err);
        if err.is_decode() {
            return PortalError::Decode(format!("Invalid response body: {}", err));
        }
        match err.status() {
            Some(status) => PortalError::from_status(status, err.to_string()),
            None => PortalError::Network(format!("Request failed: {}", err)),
        }
    }
}

impl From<sqlx::Error> for PortalError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Storage error: {:?}", err);
        PortalError::Storage(format!("Storage error: {}", err))
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        PortalError::Decode(format!("JSON error: {}", err))
    }
}

/// Result alias used across the crate.
pub type PortalResult<T> = Result<T, PortalError>;
