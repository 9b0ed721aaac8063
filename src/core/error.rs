use std::fmt;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required field or relationship is absent before an outbound call
    #[error("Missing property: {0}")]
    MissingProperty(String),

    /// An operation was attempted against an aggregate whose status forbids it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A caller-supplied version does not match the version Square expects
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// A refund request exceeds the refundable quantity
    #[error("Quantity error: {0}")]
    QuantityExceeded(String),

    /// Square API errors (carries Square's message and error code)
    #[error("Square API error: {0}")]
    Api(ApiErrorDetails),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Details of an error reported by the Square API
#[derive(Debug, Clone)]
pub struct ApiErrorDetails {
    pub status: u16,
    pub code: Option<String>,
    pub message: String,
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({}): {}", self.status, code, self.message),
            None => write!(f, "{}: {}", self.status, self.message),
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn missing_property(msg: impl Into<String>) -> Self {
        AppError::MissingProperty(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        AppError::InvalidState(msg.into())
    }

    pub fn invalid_version(msg: impl Into<String>) -> Self {
        AppError::InvalidVersion(msg.into())
    }

    pub fn quantity_exceeded(msg: impl Into<String>) -> Self {
        AppError::QuantityExceeded(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn api(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        AppError::Api(ApiErrorDetails {
            status,
            code,
            message: message.into(),
        })
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
