use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrollmentError {
    #[error("There is a problem with the given CEP")]
    BadRequest,

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 對外的錯誤物件 `{ name, message }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationError {
    pub name: String,
    pub message: String,
}

impl EnrollmentError {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BadRequest => "badRequestError",
            Self::InvalidField { .. } => "invalidDataError",
            Self::ApiError(_) => "upstreamError",
            Self::IoError(_) | Self::SerializationError(_) => "storageError",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "configurationError",
        }
    }

    pub fn to_application_error(&self) -> ApplicationError {
        ApplicationError {
            name: self.name().to_string(),
            message: self.to_string(),
        }
    }

    /// Whether the caller sent something wrong, as opposed to an upstream or local failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BadRequest | Self::InvalidField { .. })
    }
}

pub type Result<T> = std::result::Result<T, EnrollmentError>;
