//! Error types for the astroKapsel server.
//!
//! Domain errors (configuration, comet registry, summary generation) are aggregated with
//! library errors into a single [`Error`]. Every error converts into an HTTP response so
//! controllers can return `Result<_, Error>` directly.

pub mod comet;
pub mod config;
pub mod generation;
pub mod retry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{comet::CometError, config::ConfigError, generation::GenerationError},
};

/// Main error type for the astroKapsel server.
///
/// Uses `thiserror`'s `#[from]` so `?` converts underlying errors automatically. The
/// `IntoResponse` implementation maps domain errors to their status codes and logs
/// everything else as an internal server error.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Comet registry error (unknown comet or flyby, invalid designation).
    #[error(transparent)]
    CometError(#[from] CometError),
    /// Summary generation error (validation, generation service, parsing, write-back).
    #[error(transparent)]
    GenerationError(#[from] GenerationError),
    /// Internal error indicating a bug in astroKapsel's code.
    #[error("Internal error: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// HTTP client error while talking to the generation service.
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::CometError(err) => err.into_response(),
            Self::GenerationError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper converting any displayable error into a logged 500 response.
///
/// The full error is logged while the client receives a generic message.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}

/// Builds a JSON error response with the given status and message.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}
