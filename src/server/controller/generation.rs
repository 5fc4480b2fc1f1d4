use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        generation::{
            GenerateSummaryDto, GenerationOutcomeDto, GenerationResponseDto, GenerationStatusDto,
        },
    },
    server::{
        controller::util::{existing_session_workspace, session_workspace},
        error::Error,
        model::app::AppState,
        service::{
            orchestrator::{state::GenerationState, Admission},
            workspace::summary_dto,
        },
    },
};

pub static GENERATION_TAG: &str = "generation";

/// Generate the summary of a flyby window
///
/// Returns immediately: 202 when a background generation was started, 200 with the cached
/// summary when the window already has one. Poll `GET /api/generation` for progress.
#[utoipa::path(
    post,
    path = "/api/generation",
    tag = GENERATION_TAG,
    request_body = GenerateSummaryDto,
    responses(
        (status = 200, description = "Window already summarized, nothing generated", body = GenerationResponseDto),
        (status = 202, description = "Generation started", body = GenerationResponseDto),
        (status = 400, description = "Missing comet or flyby ID", body = ErrorDto),
        (status = 404, description = "Comet or window not found", body = ErrorDto),
        (status = 409, description = "Another generation is in flight for this session", body = ErrorDto),
        (status = 503, description = "Generation service not configured", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn generate_summary(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<GenerateSummaryDto>,
) -> Result<impl IntoResponse, Error> {
    let workspace = session_workspace(&state, &session).await?;

    let admission = state
        .orchestrator
        .generate(&workspace, request.into())
        .await?;

    let status = workspace.lock().await.generation.to_dto();

    let response = match admission {
        Admission::Started(_) => (
            StatusCode::ACCEPTED,
            GenerationResponseDto {
                outcome: GenerationOutcomeDto::Started,
                status,
                summary: None,
            },
        ),
        Admission::AlreadySummarized(summary) => (
            StatusCode::OK,
            GenerationResponseDto {
                outcome: GenerationOutcomeDto::AlreadySummarized,
                status,
                summary: Some(summary_dto(&summary)),
            },
        ),
    };

    Ok((response.0, Json(response.1)))
}

/// Get the generation status of the session
#[utoipa::path(
    get,
    path = "/api/generation",
    tag = GENERATION_TAG,
    responses(
        (status = 200, description = "Current generation status", body = GenerationStatusDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_generation_status(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let status = match existing_session_workspace(&state, &session).await? {
        Some(workspace) => workspace.lock().await.generation.to_dto(),
        None => GenerationState::Idle.to_dto(),
    };

    Ok((StatusCode::OK, Json(status)))
}

/// Cancel the session's in-flight generation
///
/// The generation stops at its next status check and ends as failed.
#[utoipa::path(
    delete,
    path = "/api/generation",
    tag = GENERATION_TAG,
    responses(
        (status = 202, description = "Cancellation requested", body = GenerationStatusDto),
        (status = 200, description = "Nothing in flight, status unchanged", body = GenerationStatusDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel_generation(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let Some(workspace) = existing_session_workspace(&state, &session).await? else {
        return Ok((StatusCode::OK, Json(GenerationState::Idle.to_dto())));
    };

    let cancelled = state.orchestrator.cancel(&workspace).await;
    let status = workspace.lock().await.generation.to_dto();

    let code = if cancelled {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };

    Ok((code, Json(status)))
}
