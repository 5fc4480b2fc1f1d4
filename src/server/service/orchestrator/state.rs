use crate::{
    model::generation::{GenerationPhaseDto, GenerationStatusDto},
    server::{
        error::{comet::CometError, generation::GenerationError, Error},
        service::window::WindowKey,
    },
};

/// Category of a failed generation, reported to the client alongside the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Request was missing fields or generation is not configured
    Input,
    /// Comet, flybys or summaries could not be loaded
    DataFetch,
    /// Generation service failed, timed out, was cancelled or returned unusable output
    Generation,
    /// Summary was generated but could not be stored
    WriteBack,
}

impl FailureKind {
    pub fn of(error: &Error) -> Self {
        match error {
            Error::GenerationError(err) => match err {
                GenerationError::MissingField(_) | GenerationError::NotConfigured => Self::Input,
                GenerationError::WriteBack(_) => Self::WriteBack,
                _ => Self::Generation,
            },
            Error::CometError(CometError::InvalidWindowKey(_)) => Self::Input,
            Error::CometError(_) => Self::DataFetch,
            Error::ConfigError(_) => Self::Input,
            Error::DbErr(_) | Error::SessionError(_) => Self::DataFetch,
            Error::ReqwestError(_) | Error::InternalError(_) => Self::Generation,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::DataFetch => "data_fetch",
            Self::Generation => "generation",
            Self::WriteBack => "write_back",
        }
    }
}

/// Generation progress of one workspace.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerationState {
    Idle,
    Requesting {
        window: WindowKey,
    },
    Polling {
        window: WindowKey,
        attempt: u32,
        max_attempts: u32,
    },
    Succeeded {
        window: WindowKey,
        summary_id: i32,
        message: String,
    },
    Failed {
        window: Option<WindowKey>,
        kind: FailureKind,
        message: String,
    },
}

impl GenerationState {
    pub fn failed(window: Option<WindowKey>, error: &Error) -> Self {
        Self::Failed {
            window,
            kind: FailureKind::of(error),
            message: error.to_string(),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Requesting { .. } | Self::Polling { .. })
    }

    pub fn window(&self) -> Option<WindowKey> {
        match self {
            Self::Idle => None,
            Self::Requesting { window }
            | Self::Polling { window, .. }
            | Self::Succeeded { window, .. } => Some(*window),
            Self::Failed { window, .. } => *window,
        }
    }

    /// Human readable status line.
    pub fn message(&self) -> String {
        match self {
            Self::Idle => "No summary is being generated".to_string(),
            Self::Requesting { window } => format!("Requesting a summary for window {window}"),
            Self::Polling {
                window,
                attempt,
                max_attempts,
            } => format!("Waiting for the summary of window {window} (check {attempt}/{max_attempts})"),
            Self::Succeeded { message, .. } | Self::Failed { message, .. } => message.clone(),
        }
    }

    pub fn to_dto(&self) -> GenerationStatusDto {
        let (phase, attempt, max_attempts, summary_id, failure) = match self {
            Self::Idle => (GenerationPhaseDto::Idle, None, None, None, None),
            Self::Requesting { .. } => (GenerationPhaseDto::Requesting, None, None, None, None),
            Self::Polling {
                attempt,
                max_attempts,
                ..
            } => (
                GenerationPhaseDto::Polling,
                Some(*attempt),
                Some(*max_attempts),
                None,
                None,
            ),
            Self::Succeeded { summary_id, .. } => {
                (GenerationPhaseDto::Succeeded, None, None, Some(*summary_id), None)
            }
            Self::Failed { kind, .. } => (
                GenerationPhaseDto::Failed,
                None,
                None,
                None,
                Some(kind.as_str().to_string()),
            ),
        };

        GenerationStatusDto {
            phase,
            window: self.window().map(|key| key.to_string()),
            attempt,
            max_attempts,
            summary_id,
            failure,
            message: self.message(),
        }
    }
}
