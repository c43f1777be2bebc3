use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::IncidentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Fixture,
    Runtime,
    Internal,
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("incident {0} not found")]
    IncidentNotFound(IncidentId),
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("malformed fixture data in {origin}: {source}")]
    Fixture {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read fixture file '{}': {source}", .path.display())]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no async runtime available for deferred work: {0}")]
    RuntimeUnavailable(String),
}

impl DashboardError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DashboardError::IncidentNotFound(_) => ErrorCode::NotFound,
            DashboardError::Validation { .. } => ErrorCode::Validation,
            DashboardError::Fixture { .. } | DashboardError::FixtureIo { .. } => {
                ErrorCode::Fixture
            }
            DashboardError::RuntimeUnavailable(_) => ErrorCode::Runtime,
        }
    }
}

/// Serializable form of a [`DashboardError`], for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorReport {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&DashboardError> for ErrorReport {
    fn from(value: &DashboardError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}
