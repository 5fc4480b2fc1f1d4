use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Errors raised by the comet registry and window lookups.
#[derive(Error, Debug)]
pub enum CometError {
    /// No comet exists with the given ID.
    #[error("Comet {0} not found")]
    CometNotFound(i32),
    /// No flyby exists with the given ID.
    #[error("Flyby {0} not found")]
    FlybyNotFound(i32),
    /// The designation does not follow NASA comet naming.
    #[error("Invalid comet designation {0:?}")]
    InvalidDesignation(String),
    /// A comet with the designation is already registered.
    #[error("Comet {0:?} is already registered")]
    DuplicateDesignation(String),
    /// Flyby input is inconsistent (conflicting or non-finite dates).
    #[error("Invalid flyby: {0}")]
    InvalidFlyby(String),
    /// The window key could not be parsed.
    #[error("Invalid window key {0:?}")]
    InvalidWindowKey(String),
    /// The two flybys are not adjacent perihelion passages of the comet.
    #[error("Window {window} is not a flyby window of comet {comet_id}")]
    WindowNotFound { comet_id: i32, window: String },
}

impl IntoResponse for CometError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::CometNotFound(_) | Self::FlybyNotFound(_) | Self::WindowNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::InvalidDesignation(_) | Self::InvalidFlyby(_) | Self::InvalidWindowKey(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::DuplicateDesignation(_) => StatusCode::CONFLICT,
        };

        tracing::debug!("Comet request rejected: {}", self);

        error_response(status, self.to_string())
    }
}
