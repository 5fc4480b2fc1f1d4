use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Errors raised while generating a flyby window summary.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// A required identifying field was absent from the request.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// No API key is configured for the generation service.
    #[error("The generation service is not configured")]
    NotConfigured,
    /// Another window of the same session is already being generated.
    #[error("A summary is already being generated for window {window}")]
    InFlight { window: String },
    /// The generation service answered with a non-success status.
    #[error("Generation service responded with status {status}: {message}")]
    ServiceStatus { status: u16, message: String },
    /// The generation job reported failure.
    #[error("Generation job failed: {0}")]
    JobFailed(String),
    /// The job did not reach a terminal status within the polling budget.
    #[error("Generation did not finish after {attempts} status checks")]
    TimedOut { attempts: u32 },
    /// The in-flight generation was cancelled by the session.
    #[error("Generation was cancelled")]
    Cancelled,
    /// The job completed without any generated text.
    #[error("Generation returned no content")]
    EmptyContent,
    /// The generated text is not a summary document.
    #[error("Unable to parse generated summary: {0}")]
    Unparseable(String),
    /// The image job completed without an image payload or with invalid data.
    #[error("Invalid generated image: {0}")]
    InvalidImage(String),
    /// The summary was generated but could not be stored.
    #[error("Summary was generated but could not be saved: {0}")]
    WriteBack(String),
}

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingField(_) => StatusCode::BAD_REQUEST,
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::InFlight { .. } | Self::Cancelled => StatusCode::CONFLICT,
            Self::TimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::WriteBack(_) => {
                tracing::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ServiceStatus { .. }
            | Self::JobFailed(_)
            | Self::EmptyContent
            | Self::Unparseable(_)
            | Self::InvalidImage(_) => StatusCode::BAD_GATEWAY,
        };

        error_response(status, self.to_string())
    }
}
