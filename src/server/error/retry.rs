use sea_orm::DbErr;

use super::Error;

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (transient failures)
    Retry,
    /// Failed permanently (bad request, bad data, bug)
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::ReqwestError(reqwest_error) => match reqwest_error.status() {
                // Generation service temporarily unavailable
                Some(status) if status.is_server_error() => ErrorRetryStrategy::Retry,
                // We're sending requests the service rejects, retrying won't help
                Some(_) => ErrorRetryStrategy::Fail,
                // Network error or connection issue
                None => ErrorRetryStrategy::Retry,
            },

            Self::DbErr(db_err) => match db_err {
                // Connection acquisition & connection errors are transient
                DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                DbErr::Conn(_) => ErrorRetryStrategy::Retry,

                // Query, constraint, type conversion & record errors won't resolve with retry
                _ => ErrorRetryStrategy::Fail,
            },

            // Session store errors - transient
            Self::SessionError(_) => ErrorRetryStrategy::Retry,

            Self::ConfigError(_) => ErrorRetryStrategy::Fail,
            Self::CometError(_) => ErrorRetryStrategy::Fail,
            Self::GenerationError(_) => ErrorRetryStrategy::Fail,
            Self::InternalError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
