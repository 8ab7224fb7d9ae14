//! Error types for the library admin client

use thiserror::Error;

/// Client error codes, one per failure category surfaced to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    Forbidden = 3,
    NotFound = 4,
    ServerFault = 5,
    Connectivity = 6,
    Rejected = 7,
    BadValue = 8,
    CorruptedState = 9,
    StorageFailure = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No response was received (connection refused, DNS, timeout, ...)
    #[error("Connectivity failure: {0}")]
    Connectivity(String),

    /// Backend answered 401; the local session has been torn down
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server fault ({status}): {message}")]
    ServerFault { status: u16, message: String },

    /// Any other non-2xx answer (validation rejected by the backend, 400, 409, ...)
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Persisted session slots are unreadable or inconsistent
    #[error("Malformed local state: {0}")]
    MalformedLocalState(String),

    /// Login refused by the backend (success flag false, missing token)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Client-side form check failed, nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Connectivity(_) => ErrorCode::Connectivity,
            AppError::Unauthorized(_) | AppError::Authentication(_) => ErrorCode::NotAuthorized,
            AppError::Forbidden(_) => ErrorCode::Forbidden,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::ServerFault { .. } => ErrorCode::ServerFault,
            AppError::Rejected { .. } => ErrorCode::Rejected,
            AppError::MalformedLocalState(_) => ErrorCode::CorruptedState,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::Storage(_) => ErrorCode::StorageFailure,
            AppError::Serialization(_) | AppError::Config(_) | AppError::Internal(_) => {
                ErrorCode::Failure
            }
        }
    }

    /// Human-readable text for display, without the category prefix
    pub fn user_message(&self) -> String {
        match self {
            AppError::Connectivity(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::MalformedLocalState(msg)
            | AppError::Authentication(msg)
            | AppError::Validation(msg)
            | AppError::Storage(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::ServerFault { message, .. } | AppError::Rejected { message, .. } => {
                message.clone()
            }
            AppError::Serialization(e) => e.to_string(),
            AppError::Config(e) => e.to_string(),
        }
    }

    /// HTTP status carried by the error, when it came from a backend answer
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Unauthorized(_) => Some(401),
            AppError::Forbidden(_) => Some(403),
            AppError::NotFound(_) => Some(404),
            AppError::ServerFault { status, .. } | AppError::Rejected { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Whether this failure collapses the local session back to anonymous
    pub fn tears_down_session(&self) -> bool {
        matches!(self, AppError::Unauthorized(_) | AppError::MalformedLocalState(_))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;
