//! Error types for the dispatch workflows.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cannot move {entity} from '{from}' to '{to}'")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Station '{station_id}' is unavailable: {reason}")]
    StationUnavailable { station_id: String, reason: String },

    #[error("Station '{station_id}' has no active unit in an Operations department")]
    NoOperationalUnit { station_id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DispatchError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        DispatchError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        DispatchError::Validation(msg.into())
    }

    pub fn unavailable(station_id: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::StationUnavailable {
            station_id: station_id.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code, rendered in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::NotFound { .. } => "not_found",
            DispatchError::Validation(_) => "validation_failed",
            DispatchError::InvalidTransition { .. } => "invalid_transition",
            DispatchError::StationUnavailable { .. } => "station_unavailable",
            DispatchError::NoOperationalUnit { .. } => "no_operational_unit",
            DispatchError::Conflict(_) => "conflict",
            DispatchError::Store(_) => "store_error",
            DispatchError::Json(_) => "store_error",
        }
    }

    /// True for failures caused by the caller rather than the backend
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DispatchError::Store(_) | DispatchError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
