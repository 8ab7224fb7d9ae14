//! Response envelope shared by the backend's resource endpoints

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// `{success, message, data, timestamp}` wrapper around every resource payload
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    pub timestamp: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Payload of a single-record endpoint
    pub fn into_data(self, what: &str) -> AppResult<T> {
        self.data
            .ok_or_else(|| AppError::Internal(format!("{} response missing data", what)))
    }
}

impl<T> ApiEnvelope<Vec<T>> {
    /// Payload of a list endpoint; an absent list reads as empty
    pub fn into_list(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}
